//! Chat route: `POST /api/chat`.
//!
//! The handler parses the body itself instead of using the `Json` extractor,
//! so every malformed input maps to the same 400 envelope instead of axum's
//! default rejection text.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use envelopes::ChatReply;
use tracing::warn;

use crate::services::chat::{self as chat_svc, ChatError};
use crate::state::AppState;

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let class = self.class();
        let status = StatusCode::from_u16(class.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(class.envelope())).into_response()
    }
}

/// `POST /api/chat`: answer one user message.
pub async fn post_chat(State(state): State<AppState>, body: Bytes) -> Result<Json<ChatReply>, ChatError> {
    let request = chat_svc::parse_request(&body).inspect_err(|e| warn!(error = %e, "chat: rejected request"))?;
    let reply = chat_svc::handle_chat(&state, &request).await?;
    Ok(Json(reply))
}

#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;
