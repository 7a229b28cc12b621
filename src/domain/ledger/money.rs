//! Monetary value objects. Amounts are whole currency units.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// Price of one reading. Zero is allowed; negative prices are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(i64);

impl Price {
    pub fn new(units: i64) -> Result<Self, ValidationError> {
        if units < 0 {
            return Err(ValidationError::out_of_range("price", 0, i64::MAX, units));
        }
        Ok(Self(units))
    }

    pub fn units(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strictly positive top-up amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CreditAmount(i64);

impl CreditAmount {
    pub fn new(units: i64) -> Result<Self, ValidationError> {
        if units <= 0 {
            return Err(ValidationError::out_of_range("amount", 1, i64::MAX, units));
        }
        Ok(Self(units))
    }

    /// Parses a `topup` argument. Only plain ASCII digits are accepted.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::empty_field("amount"));
        }
        if !input.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format("amount", "expected a whole number"));
        }
        let units = input
            .parse::<i64>()
            .map_err(|e| ValidationError::invalid_format("amount", e.to_string()))?;
        Self::new(units)
    }

    pub fn units(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CreditAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
