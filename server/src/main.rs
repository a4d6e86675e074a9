mod llm;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env file is fine; the process environment still applies.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    // Initialize LLM client (non-fatal: demo replies if config missing).
    let state = match llm::LlmClient::from_env() {
        Ok(client) => {
            tracing::info!(model = llm::LlmChat::model(&client), "LLM client initialized");
            let params = client.params();
            let client: Arc<dyn llm::LlmChat> = Arc::new(client);
            state::AppState::new(Some(client), params)
        }
        Err(e) if e.is_unconfigured() => {
            tracing::warn!(error = %e, "LLM client not configured, serving demo replies");
            state::AppState::degraded()
        }
        Err(e) => {
            tracing::error!(error = %e, "LLM client failed to initialize, serving demo replies");
            state::AppState::degraded()
        }
    };

    let degraded = state.is_degraded();
    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, degraded, "chat gateway listening");
    axum::serve(listener, app).await.expect("server failed");
}
