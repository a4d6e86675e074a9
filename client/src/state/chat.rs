//! Chat session controller: message log plus single-flight requests.
//!
//! DESIGN
//! ======
//! [`ChatSession`] is a cheap cloneable handle over shared state, so a UI can
//! call [`ChatSession::cancel_request`] or [`ChatSession::clear_chat`] while a
//! [`ChatSession::send_message`] future is suspended on the network.
//!
//! At most one request is in flight. The in-flight slot records the
//! placeholder id and the request's cancellation token. A finished request
//! applies its result only if the slot still names its placeholder; cancel
//! and clear empty the slot first, so a late response can never touch a log
//! it no longer belongs to.
//!
//! Cancelling removes the placeholder and surfaces no error.

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use envelopes::{CONVERSATION_WINDOW, ChatRequest, ConversationTurn};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::message::ChatMessage;
use crate::config::ClientConfig;
use crate::net::api::{ChatTransport, HttpTransport, TransportError};

/// Greeting shown when a session starts.
pub const INITIAL_GREETING: &str = "Hello! I'm your NexScholar AI Assistant. I'm here to help you navigate \
scholarships and make the most of our platform. How can I assist you today?";

/// Greeting shown after the conversation is cleared.
pub const CLEARED_GREETING: &str = "Hello! I'm your NexScholar AI Assistant. How can I help you today?";

/// How a [`ChatSession::send_message`] call ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input or a request was already in flight; nothing changed.
    Ignored,
    /// The placeholder now holds the gateway's reply.
    Replied,
    /// The placeholder was replaced by an error message.
    Failed,
    /// Cancelled or cleared before the reply was applied.
    Cancelled,
}

struct InFlight {
    placeholder: Uuid,
    token: CancellationToken,
}

struct SessionInner {
    messages: Vec<ChatMessage>,
    error: Option<String>,
    in_flight: Option<InFlight>,
}

impl SessionInner {
    fn remove_message(&mut self, id: Uuid) {
        self.messages.retain(|m| m.id != id);
    }

    /// Take the in-flight slot only if it still belongs to `placeholder`.
    fn take_in_flight(&mut self, placeholder: Uuid) -> Option<InFlight> {
        if self
            .in_flight
            .as_ref()
            .is_some_and(|f| f.placeholder == placeholder)
        {
            self.in_flight.take()
        } else {
            None
        }
    }

    /// Cancel whatever is in flight and drop its placeholder.
    fn abort_in_flight(&mut self) -> bool {
        let Some(flight) = self.in_flight.take() else {
            return false;
        };
        flight.token.cancel();
        self.remove_message(flight.placeholder);
        true
    }
}

/// Owner of one conversation's message log.
pub struct ChatSession<T> {
    inner: Arc<Mutex<SessionInner>>,
    transport: Arc<T>,
    request_timeout: Duration,
}

impl<T> Clone for ChatSession<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            transport: Arc::clone(&self.transport),
            request_timeout: self.request_timeout,
        }
    }
}

impl ChatSession<HttpTransport> {
    /// Session talking HTTP to the gateway named in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] if the HTTP client cannot be built.
    pub fn connect(config: &ClientConfig) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(&config.base_url)?;
        Ok(Self::new(transport).with_timeout(config.request_timeout))
    }
}

impl<T: ChatTransport> ChatSession<T> {
    /// Fresh session holding only the initial greeting.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionInner {
                messages: vec![ChatMessage::assistant(INITIAL_GREETING)],
                error: None,
                in_flight: None,
            })),
            transport: Arc::new(transport),
            request_timeout: ClientConfig::default().request_timeout,
        }
    }

    /// Upper bound on one gateway round trip. Expiry counts as a failure.
    #[must_use]
    pub fn with_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Snapshot of the log, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.lock().messages.clone()
    }

    /// Error from the last failed send, cleared by the next send or a clear.
    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Whether a request is in flight. UIs disable their send control on this.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.lock().in_flight.is_some()
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// Send `text` and wait for the gateway.
    ///
    /// Blank input, or a call while another request is in flight, is ignored.
    /// Otherwise the trimmed text is appended as a user message followed by a
    /// pending placeholder, and the request carries the conversation window as
    /// it stood before this message. The placeholder is then settled with the
    /// reply, swapped for an error message, or removed on cancellation.
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        let content = text.trim();
        if content.is_empty() {
            return SendOutcome::Ignored;
        }

        let (request, placeholder, token) = {
            let mut inner = self.lock();
            if inner.in_flight.is_some() {
                debug!("chat: send ignored, request already in flight");
                return SendOutcome::Ignored;
            }

            inner.error = None;
            let conversation = conversation_window(&inner.messages);
            inner.messages.push(ChatMessage::user(content));
            let placeholder = ChatMessage::pending();
            let placeholder_id = placeholder.id;
            inner.messages.push(placeholder);

            let token = CancellationToken::new();
            let flight = InFlight { placeholder: placeholder_id, token: token.clone() };
            if let Some(previous) = inner.in_flight.replace(flight) {
                previous.token.cancel();
                inner.remove_message(previous.placeholder);
            }

            let request = ChatRequest { message: content.to_owned(), conversation };
            (request, placeholder_id, token)
        };

        info!(message_len = request.message.len(), history_len = request.conversation.len(), "chat: sending");

        let result = tokio::select! {
            biased;
            () = token.cancelled() => None,
            result = tokio::time::timeout(self.request_timeout, self.transport.send(&request)) => {
                Some(result.unwrap_or_else(|_| Err(TransportError::Timeout(self.request_timeout))))
            }
        };

        let mut inner = self.lock();
        if inner.take_in_flight(placeholder).is_none() {
            debug!("chat: result dropped, request was cancelled or cleared");
            return SendOutcome::Cancelled;
        }

        match result {
            None => {
                inner.remove_message(placeholder);
                SendOutcome::Cancelled
            }
            Some(Ok(reply)) => {
                if let Some(msg) = inner.messages.iter_mut().find(|m| m.id == placeholder) {
                    msg.settle(reply.response);
                }
                info!("chat: reply received");
                SendOutcome::Replied
            }
            Some(Err(e)) => {
                warn!(error = %e, "chat: request failed");
                let error = e.to_string();
                inner.remove_message(placeholder);
                inner.messages.push(ChatMessage::failed(&error));
                inner.error = Some(error);
                SendOutcome::Failed
            }
        }
    }

    /// Abort the in-flight request, if any. Returns whether one was aborted.
    pub fn cancel_request(&self) -> bool {
        let aborted = self.lock().abort_in_flight();
        if aborted {
            info!("chat: request cancelled");
        }
        aborted
    }

    /// Reset the log to a single greeting and clear the error.
    ///
    /// Any in-flight request is cancelled first so its reply cannot land in
    /// the fresh log.
    pub fn clear_chat(&self) {
        let mut inner = self.lock();
        inner.abort_in_flight();
        inner.messages = vec![ChatMessage::assistant(CLEARED_GREETING)];
        inner.error = None;
        info!("chat: conversation cleared");
    }
}

/// The most recent settled messages, oldest first, as wire turns.
#[must_use]
pub fn conversation_window(messages: &[ChatMessage]) -> Vec<ConversationTurn> {
    let settled: Vec<&ChatMessage> = messages.iter().filter(|m| !m.is_pending()).collect();
    settled[settled.len().saturating_sub(CONVERSATION_WINDOW)..]
        .iter()
        .map(|m| m.to_turn())
        .collect()
}
