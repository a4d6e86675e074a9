//! Client-side conversation state.

pub mod chat;
pub mod message;
