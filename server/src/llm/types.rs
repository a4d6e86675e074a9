//! LLM types: provider-neutral prompt types and errors.
//!
//! Shared by the OpenAI-compatible client and the chat service. The
//! [`LlmChat`] trait is the seam the gateway depends on, so tests can swap in
//! a mock completion service.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by LLM client operations.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    /// The required API key environment variable is not set or is empty.
    #[error("missing API key: env var {var} not set")]
    MissingApiKey { var: String },

    /// The API key is still the template placeholder.
    #[error("API key in env var {var} is a placeholder")]
    PlaceholderApiKey { var: String },

    /// The HTTP request to the LLM provider failed.
    #[error("API request failed: {0}")]
    ApiRequest(String),

    /// The LLM provider returned a non-success HTTP status.
    #[error("API response error: status {status}")]
    ApiResponse { status: u16, body: String },

    /// The LLM provider response body could not be deserialized.
    #[error("API response parse failed: {0}")]
    ApiParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

impl LlmError {
    /// Whether the provider signalled throttling.
    ///
    /// Status 429 always counts. Otherwise any error text mentioning a rate
    /// limit does, since some providers report throttling inside a 4xx/5xx body.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::ApiResponse { status: 429, .. } => true,
            Self::ApiResponse { body, .. } => mentions_rate_limit(body),
            other => mentions_rate_limit(&other.to_string()),
        }
    }

    /// True for configuration problems that mean "no usable upstream".
    #[must_use]
    pub fn is_unconfigured(&self) -> bool {
        matches!(self, Self::MissingApiKey { .. } | Self::PlaceholderApiKey { .. })
    }
}

fn mentions_rate_limit(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    lower.contains("rate limit") || lower.contains("rate_limit")
}

// =============================================================================
// PROMPT TYPES
// =============================================================================

/// Role tag on a prompt entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single role-tagged prompt entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: Role::System, content: content.into() }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: Role::User, content: content.into() }
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: Role::Assistant, content: content.into() }
    }
}

/// Sampling parameters sent with every completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Response from an LLM chat call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// First choice text. `None` when the provider returned no content.
    pub content: Option<String>,
    pub model: String,
    pub finish_reason: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

// =============================================================================
// LLM CHAT TRAIT
// =============================================================================

/// Provider-neutral async trait for LLM chat. Enables mocking in tests.
#[async_trait::async_trait]
pub trait LlmChat: Send + Sync {
    /// Send a non-streaming completion request.
    ///
    /// # Errors
    ///
    /// Returns an [`LlmError`] if the request fails or the response is malformed.
    async fn chat(&self, params: CompletionParams, messages: &[PromptMessage]) -> Result<ChatResponse, LlmError>;

    /// Model identifier used for requests.
    fn model(&self) -> &str;
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
