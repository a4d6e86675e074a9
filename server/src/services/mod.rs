//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own prompt assembly and upstream calls so route handlers
//! can stay focused on protocol translation.

pub mod chat;
