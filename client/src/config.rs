//! Client configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Gateway origin, without the `/api/chat` path.
    pub base_url: String,
    /// Upper bound on one round trip.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Build config from environment variables.
    ///
    /// - `CHAT_BASE_URL`: default `http://127.0.0.1:3000`
    /// - `CHAT_REQUEST_TIMEOUT_SECS`: default 30; zero or unparseable falls back
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("CHAT_BASE_URL").ok().as_deref(),
            std::env::var("CHAT_REQUEST_TIMEOUT_SECS").ok().as_deref(),
        )
    }

    fn from_values(base_url: Option<&str>, timeout_secs: Option<&str>) -> Self {
        let base_url = base_url
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        let secs = timeout_secs
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        Self { base_url, request_timeout: Duration::from_secs(secs) }
    }
}
