//! Application configuration module
//!
//! Configuration is read once at startup from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `TAROT` prefix and nested
//! values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use tarot_bot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Paid reading costs {}", config.reading.price);
//! ```

mod ai;
mod bot;
mod database;
mod error;
mod logging;
mod reading;

pub use ai::AiConfig;
pub use bot::BotConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogConfig, LogFormat};
pub use reading::ReadingConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults so a missing bot token surfaces from
/// [`AppConfig::validate`] with a readable message rather than as a
/// deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Chat transport (token, admin)
    #[serde(default)]
    pub bot: BotConfig,

    /// Answer synthesis backend
    #[serde(default)]
    pub ai: AiConfig,

    /// PostgreSQL store; unset means in-memory
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Price and history settings
    #[serde(default)]
    pub reading: ReadingConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `TAROT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `TAROT__BOT__TOKEN=123:abc` -> `bot.token = "123:abc"`
    /// - `TAROT__READING__PRICE=199` -> `reading.price = 199`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("TAROT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section, starting with
    /// a missing bot token.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.bot.validate()?;
        self.ai.validate()?;
        self.database.validate()?;
        self.reading.validate()?;
        self.log.validate()?;
        Ok(())
    }
}
