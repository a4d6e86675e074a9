//! Network access to the chat gateway.

pub mod api;
