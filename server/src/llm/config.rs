//! LLM configuration parsed from environment variables.

use super::types::{CompletionParams, LlmError};

pub const DEFAULT_API_KEY_ENV: &str = "GROQ_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
pub const DEFAULT_MAX_TOKENS: u32 = 500;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_LLM_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LLM_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Value shipped in the `.env` template. Treated the same as a missing key.
pub const PLACEHOLDER_API_KEY: &str = "your_actual_groq_api_key_here";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LlmTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub params: CompletionParams,
    pub timeouts: LlmTimeouts,
}

impl LlmConfig {
    /// Build typed LLM config from environment variables.
    ///
    /// Optional:
    /// - `LLM_API_KEY_ENV`: names the env var containing the key (default `GROQ_API_KEY`)
    /// - `LLM_MODEL`: default `llama3-8b-8192`
    /// - `LLM_BASE_URL`: OpenAI-compatible base URL, default Groq
    /// - `LLM_MAX_TOKENS`: default 500
    /// - `LLM_TEMPERATURE`: default 0.7
    /// - `LLM_REQUEST_TIMEOUT_SECS`: default 30
    /// - `LLM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::MissingApiKey`] when the key variable is unset or
    /// blank, and [`LlmError::PlaceholderApiKey`] when it still holds the
    /// template value. Both put the gateway in degraded mode.
    pub fn from_env() -> Result<Self, LlmError> {
        let key_var = std::env::var("LLM_API_KEY_ENV").unwrap_or_else(|_| DEFAULT_API_KEY_ENV.to_string());
        let api_key = parse_api_key(&key_var, std::env::var(&key_var).ok())?;

        let model = std::env::var("LLM_MODEL")
            .ok()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let base_url = std::env::var("LLM_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let params = CompletionParams {
            max_tokens: env_parse("LLM_MAX_TOKENS", DEFAULT_MAX_TOKENS),
            temperature: env_parse("LLM_TEMPERATURE", DEFAULT_TEMPERATURE),
        };
        let timeouts = LlmTimeouts {
            request_secs: env_parse("LLM_REQUEST_TIMEOUT_SECS", DEFAULT_LLM_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse("LLM_CONNECT_TIMEOUT_SECS", DEFAULT_LLM_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { api_key, model, base_url, params, timeouts })
    }
}

/// Default sampling parameters, used in degraded mode and by tests.
#[must_use]
pub fn default_params() -> CompletionParams {
    CompletionParams { max_tokens: DEFAULT_MAX_TOKENS, temperature: DEFAULT_TEMPERATURE }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_api_key(var: &str, raw: Option<String>) -> Result<String, LlmError> {
    let key = raw
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or_else(|| LlmError::MissingApiKey { var: var.to_string() })?;
    if key == PLACEHOLDER_API_KEY {
        return Err(LlmError::PlaceholderApiKey { var: var.to_string() });
    }
    Ok(key)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
