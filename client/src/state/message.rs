//! Conversation messages.
//!
//! DESIGN
//! ======
//! A message's body lives in [`MessageState`] instead of a `pending` flag
//! next to a nullable string, so a placeholder can never carry content and
//! a settled message can never be pending.

#[cfg(test)]
#[path = "message_test.rs"]
mod message_test;

use envelopes::ConversationTurn;
use time::OffsetDateTime;
use uuid::Uuid;

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Origin {
    User,
    Assistant,
}

/// Lifecycle of a message body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MessageState {
    /// Typing placeholder awaiting the gateway.
    Pending,
    /// Final text.
    Settled(String),
    /// Locally synthesized error text shown in place of a reply.
    Failed(String),
}

/// One turn in the conversation log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub origin: Origin,
    pub created_at: OffsetDateTime,
    pub state: MessageState,
}

impl ChatMessage {
    fn new(origin: Origin, state: MessageState) -> Self {
        Self { id: Uuid::new_v4(), origin, created_at: OffsetDateTime::now_utc(), state }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Origin::User, MessageState::Settled(content.into()))
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Origin::Assistant, MessageState::Settled(content.into()))
    }

    /// Assistant placeholder shown while a request is in flight.
    #[must_use]
    pub fn pending() -> Self {
        Self::new(Origin::Assistant, MessageState::Pending)
    }

    /// Assistant message reporting a failed request.
    #[must_use]
    pub fn failed(error: &str) -> Self {
        Self::new(
            Origin::Assistant,
            MessageState::Failed(format!("Sorry, I encountered an error: {error}. Please try again.")),
        )
    }

    /// Display text. Empty while pending.
    #[must_use]
    pub fn content(&self) -> &str {
        match &self.state {
            MessageState::Pending => "",
            MessageState::Settled(text) | MessageState::Failed(text) => text,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, MessageState::Pending)
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.state, MessageState::Failed(_))
    }

    #[must_use]
    pub fn is_user(&self) -> bool {
        self.origin == Origin::User
    }

    /// Replace a placeholder's body with the reply. No-op unless pending.
    pub fn settle(&mut self, content: String) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.state = MessageState::Settled(content);
        true
    }

    /// Wire form for the conversation window.
    #[must_use]
    pub fn to_turn(&self) -> ConversationTurn {
        ConversationTurn { content: self.content().to_owned(), is_user: self.is_user() }
    }
}
