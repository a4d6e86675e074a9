//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the completion client built once in `main` and the sampling
//! parameters sent with every request. Handlers keep no other state, so
//! every request is independent.

use std::sync::Arc;

use crate::llm::LlmChat;
use crate::llm::config::default_params;
use crate::llm::types::CompletionParams;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Copy.
#[derive(Clone)]
pub struct AppState {
    /// Optional LLM client. `None` means degraded mode: demo replies only.
    pub llm: Option<Arc<dyn LlmChat>>,
    /// Token ceiling and temperature for completions.
    pub params: CompletionParams,
}

impl AppState {
    #[must_use]
    pub fn new(llm: Option<Arc<dyn LlmChat>>, params: CompletionParams) -> Self {
        Self { llm, params }
    }

    /// State with no upstream client.
    #[must_use]
    pub fn degraded() -> Self {
        Self::new(None, default_params())
    }

    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.llm.is_none()
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degraded_state_has_no_client() {
        let state = AppState::degraded();
        assert!(state.is_degraded());
        assert_eq!(state.params, default_params());
    }

    #[test]
    fn state_with_client_is_not_degraded() {
        let llm = test_helpers::MockLlm::new(test_helpers::MockReply::Text("hi"));
        let state = test_helpers::test_app_state_with_llm(llm);
        assert!(!state.is_degraded());
    }
}
