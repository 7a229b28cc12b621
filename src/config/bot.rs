//! Chat transport configuration

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use super::error::ValidationError;

/// Telegram Bot API settings
#[derive(Clone, Deserialize)]
pub struct BotConfig {
    /// Bot token issued by BotFather
    #[serde(default)]
    pub token: String,

    /// Platform user id allowed to run `/stats`
    pub admin_user_id: Option<i64>,

    /// Long polling timeout in seconds
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// Bot API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
}

impl BotConfig {
    /// Get poll timeout as Duration
    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    /// Validate bot configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.token.trim().is_empty() {
            return Err(ValidationError::MissingRequired("TAROT__BOT__TOKEN"));
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidUrl("bot.api_base_url"));
        }
        if self.poll_timeout_secs > 600 {
            return Err(ValidationError::InvalidTimeout("bot.poll_timeout_secs"));
        }
        Ok(())
    }
}

impl fmt::Debug for BotConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BotConfig")
            .field("token", &"[REDACTED]")
            .field("admin_user_id", &self.admin_user_id)
            .field("poll_timeout_secs", &self.poll_timeout_secs)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            admin_user_id: None,
            poll_timeout_secs: default_poll_timeout(),
            api_base_url: default_api_base_url(),
        }
    }
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}
