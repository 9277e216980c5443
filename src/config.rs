//! Bot configuration
//!
//! Read from the process environment (after an optional `.env` file):
//! - `TG_API_KEY` - Required. Telegram bot token.
//! - `TG_API_BASE_URL` - Optional. Bot API root. Defaults to `https://api.telegram.org`.
//! - `TG_POLL_TIMEOUT` - Optional. Long-poll timeout in seconds. Defaults to `30`.
//! - `TG_DEBUG` - Optional. Log raw updates and requests (`1`, `true`, `yes`).

use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[derive(Clone)]
pub struct BotConfig {
    pub api_token: String,
    pub api_base_url: String,
    pub poll_timeout_secs: u64,
    pub debug: bool,
}

// Keeps the token out of logs
impl std::fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotConfig")
            .field("api_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("debug", &self.debug)
            .finish()
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_token = lookup("TG_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("TG_API_KEY".to_string()))?;

        let api_base_url = lookup("TG_API_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .map_or_else(
                || DEFAULT_API_BASE_URL.to_string(),
                |v| v.trim_end_matches('/').to_string(),
            );

        let poll_timeout_secs = match lookup("TG_POLL_TIMEOUT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("TG_POLL_TIMEOUT".to_string(), raw))?,
            None => DEFAULT_POLL_TIMEOUT_SECS,
        };

        let debug = lookup("TG_DEBUG").is_some_and(|v| {
            matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
        });

        Ok(Self {
            api_token,
            api_base_url,
            poll_timeout_secs,
            debug,
        })
    }
}
