//! Reading and pricing configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;
use crate::domain::ledger::Price;

/// Price of a paid reading and history settings
#[derive(Debug, Clone, Deserialize)]
pub struct ReadingConfig {
    /// Price of a paid reading in whole currency units
    #[serde(default = "default_price")]
    pub price: i64,

    /// How many past readings `/history` shows
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// JSON deck replacing the built-in one
    pub cards_path: Option<PathBuf>,
}

impl ReadingConfig {
    /// Typed price
    pub fn price(&self) -> Result<Price, ValidationError> {
        Price::new(self.price).map_err(|_| ValidationError::InvalidPrice)
    }

    /// Validate reading configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.price()?;
        if self.history_limit == 0 || self.history_limit > 100 {
            return Err(ValidationError::InvalidHistoryLimit);
        }
        Ok(())
    }
}

impl Default for ReadingConfig {
    fn default() -> Self {
        Self {
            price: default_price(),
            history_limit: default_history_limit(),
            cards_path: None,
        }
    }
}

fn default_price() -> i64 {
    299
}

fn default_history_limit() -> usize {
    10
}
