//! Shared request/response envelopes for the `/api/chat` endpoint.
//!
//! This crate owns the JSON wire representation used by both `server` and
//! `client`. Field names follow the browser-facing contract (`isUser`,
//! `response`, `timestamp`, `error`), so the structs carry serde renames
//! where Rust naming differs.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Route path of the chat endpoint.
pub const CHAT_PATH: &str = "/api/chat";

/// Maximum number of prior turns forwarded with a request.
pub const CONVERSATION_WINDOW: usize = 10;

/// Error text for a missing, empty, or non-string `message`.
pub const VALIDATION_ERROR: &str = "Message is required and must be a string";

/// Error text when the completion service throttles us.
pub const RATE_LIMIT_ERROR: &str = "Too many requests. Please wait a moment and try again.";

/// Error text for every other failure.
pub const INTERNAL_ERROR: &str = "Sorry, I encountered an error. Please try again.";

/// Error returned by [`decode_reply`].
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The body was not valid JSON for the expected envelope.
    #[error("invalid envelope: {0}")]
    Json(#[from] serde_json::Error),
    /// The server answered with an error envelope.
    #[error("{message}")]
    Server { status: u16, message: String },
}

// =============================================================================
// REQUEST
// =============================================================================

/// One prior turn of the conversation, oldest first on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub content: String,
    #[serde(rename = "isUser")]
    pub is_user: bool,
}

/// Body of `POST /api/chat`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation: Vec<ConversationTurn>,
}

// =============================================================================
// RESPONSE
// =============================================================================

/// Successful reply from the gateway.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
    /// RFC 3339 / ISO-8601 UTC timestamp.
    pub timestamp: String,
}

impl ChatReply {
    /// Build a reply stamped with the current UTC time.
    #[must_use]
    pub fn now(response: impl Into<String>) -> Self {
        Self { response: response.into(), timestamp: now_rfc3339() }
    }
}

/// Error body returned with a non-2xx status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

/// Error classes the gateway can answer with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed client input.
    Validation,
    /// Upstream throttling.
    RateLimited,
    /// Anything else.
    Internal,
}

impl ErrorClass {
    /// HTTP status code carried with this class.
    #[must_use]
    pub fn status(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::RateLimited => 429,
            Self::Internal => 500,
        }
    }

    /// Fixed client-facing text for this class.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Validation => VALIDATION_ERROR,
            Self::RateLimited => RATE_LIMIT_ERROR,
            Self::Internal => INTERNAL_ERROR,
        }
    }

    /// Classify an HTTP status. Unknown statuses fold into `Internal`.
    #[must_use]
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::Validation,
            429 => Self::RateLimited,
            _ => Self::Internal,
        }
    }

    #[must_use]
    pub fn envelope(self) -> ErrorEnvelope {
        ErrorEnvelope { error: self.message().to_owned() }
    }
}

/// Decode a gateway response body given its HTTP status.
///
/// A 2xx status must carry a [`ChatReply`]. Any other status is turned into
/// [`EnvelopeError::Server`] using the body's `error` text, or the fixed text
/// for the status class when the body is not an error envelope.
///
/// # Errors
///
/// Returns [`EnvelopeError::Json`] when a 2xx body is not a valid reply, and
/// [`EnvelopeError::Server`] for every non-2xx status.
pub fn decode_reply(status: u16, body: &[u8]) -> Result<ChatReply, EnvelopeError> {
    if (200..300).contains(&status) {
        return Ok(serde_json::from_slice(body)?);
    }
    let message = serde_json::from_slice::<ErrorEnvelope>(body)
        .map(|e| e.error)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| ErrorClass::from_status(status).message().to_owned());
    Err(EnvelopeError::Server { status, message })
}

/// Current UTC time formatted as RFC 3339.
#[must_use]
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
