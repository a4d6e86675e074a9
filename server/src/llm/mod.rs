//! LLM: completion-service adapter for the chat gateway.
//!
//! DESIGN
//! ======
//! Uses environment variables instead of config files. [`LlmClient`] wraps an
//! OpenAI-compatible client (Groq in production) and is constructed once in
//! `main`, then injected into `AppState` behind the [`LlmChat`] trait.

pub mod config;
pub mod openai;
pub mod types;

use config::LlmConfig;
pub use types::LlmChat;
use types::{ChatResponse, CompletionParams, LlmError, PromptMessage};

// =============================================================================
// CLIENT
// =============================================================================

/// Concrete LLM client for the configured completion service.
///
/// Configured from environment variables by [`LlmClient::from_env`].
pub struct LlmClient {
    inner: openai::OpenAiClient,
    model: String,
    params: CompletionParams,
}

impl LlmClient {
    /// Build an LLM client from environment variables. See [`LlmConfig::from_env`].
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, LlmError> {
        let config = LlmConfig::from_env()?;
        Self::from_config(config)
    }

    /// Build an LLM client from a parsed typed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider HTTP client fails to build.
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        let inner = openai::OpenAiClient::new(config.api_key, config.base_url, config.timeouts)?;
        Ok(Self { inner, model: config.model, params: config.params })
    }

    /// Sampling parameters parsed from the environment.
    #[must_use]
    pub fn params(&self) -> CompletionParams {
        self.params
    }
}

#[async_trait::async_trait]
impl LlmChat for LlmClient {
    async fn chat(&self, params: CompletionParams, messages: &[PromptMessage]) -> Result<ChatResponse, LlmError> {
        self.inner.chat(&self.model, params, messages).await
    }

    fn model(&self) -> &str {
        &self.model
    }
}
