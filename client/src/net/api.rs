//! HTTP transport to the chat gateway.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx answers are decoded as error envelopes so the gateway's own text
//! ("Too many requests...") reaches the user. Network and decode failures get
//! short generic descriptions; cancellation never shows up here because the
//! session drops the request future instead of failing it.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use envelopes::{CHAT_PATH, ChatReply, ChatRequest, EnvelopeError};

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors from a single gateway round trip.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The gateway answered with an error envelope.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// The request never completed.
    #[error("network error: {0}")]
    Request(String),
    /// A 2xx body was not a valid reply.
    #[error("invalid response: {0}")]
    Parse(String),
    /// The session's deadline passed first.
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl From<EnvelopeError> for TransportError {
    fn from(e: EnvelopeError) -> Self {
        match e {
            EnvelopeError::Server { status, message } => Self::Server { status, message },
            EnvelopeError::Json(e) => Self::Parse(e.to_string()),
        }
    }
}

/// One request/response exchange with the gateway.
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// # Errors
    ///
    /// Returns a [`TransportError`] for non-2xx answers, network failures, and
    /// malformed bodies.
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError>;
}

#[async_trait::async_trait]
impl<U: ChatTransport + ?Sized> ChatTransport for std::sync::Arc<U> {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        (**self).send(request).await
    }
}

/// `reqwest`-backed transport posting to `<base_url>/api/chat`.
pub struct HttpTransport {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self { http, endpoint: chat_endpoint(base_url) })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl ChatTransport for HttpTransport {
    async fn send(&self, request: &ChatRequest) -> Result<ChatReply, TransportError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(envelopes::decode_reply(status, &body)?)
    }
}

fn chat_endpoint(base_url: &str) -> String {
    format!("{}{CHAT_PATH}", base_url.trim_end_matches('/'))
}
