//! Chat session controller for the scholarship assistant.
//!
//! ARCHITECTURE
//! ============
//! - `state`: the message log and the single-flight request lifecycle.
//! - `net`: the transport seam and its HTTP implementation.
//! - `config`: base URL and timeout, from the environment or defaults.
//! - `quick_actions`: canned prompts offered next to the input box.
//!
//! The controller is transport-agnostic; tests drive it with scripted
//! transports and the CLI drives it over HTTP.

pub mod config;
pub mod net;
pub mod quick_actions;
pub mod state;

pub use config::ClientConfig;
pub use net::api::{ChatTransport, HttpTransport, TransportError};
pub use state::chat::{ChatSession, SendOutcome};
pub use state::message::{ChatMessage, MessageState, Origin};
