//! Entitlement policy for readings.
//!
//! A user owns one free reading; after that each reading is paid from the
//! balance. The decision is a pure function of `(free_used, balance, price)`
//! so every store adapter can run it inside its own atomic section.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::{CreditAmount, Price};
use crate::domain::foundation::ValidationError;

/// How a granted reading was paid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantVia {
    /// The one-time free allowance was spent.
    Free,
    /// The reading price was debited from the balance.
    Paid,
}

impl fmt::Display for GrantVia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrantVia::Free => write!(f, "free"),
            GrantVia::Paid => write!(f, "paid"),
        }
    }
}

/// Outcome of an entitlement check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConsumeResult {
    Granted(GrantVia),
    /// Carries the balance seen when the policy was evaluated.
    Denied { balance: i64 },
}

impl ConsumeResult {
    pub fn is_granted(&self) -> bool {
        matches!(self, ConsumeResult::Granted(_))
    }
}

/// Balance and free-use flag of a single user.
///
/// Invariant: `balance >= 0` after every operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerState {
    pub balance: i64,
    pub free_used: bool,
}

impl LedgerState {
    /// Rebuilds state from stored values.
    pub fn new(balance: i64, free_used: bool) -> Result<Self, ValidationError> {
        if balance < 0 {
            return Err(ValidationError::out_of_range("balance", 0, i64::MAX, balance));
        }
        Ok(Self { balance, free_used })
    }

    /// Applies the entitlement policy, mutating only on a grant.
    ///
    /// Evaluated in order: unused free reading, then sufficient balance,
    /// otherwise denial.
    pub fn consume(&mut self, price: Price) -> ConsumeResult {
        if !self.free_used {
            self.free_used = true;
            return ConsumeResult::Granted(GrantVia::Free);
        }
        if self.balance >= price.units() {
            self.balance -= price.units();
            return ConsumeResult::Granted(GrantVia::Paid);
        }
        ConsumeResult::Denied {
            balance: self.balance,
        }
    }

    /// Adds a trusted credit to the balance.
    pub fn credit(&mut self, amount: CreditAmount) -> Result<(), ValidationError> {
        let current = self.balance;
        self.balance = current
            .checked_add(amount.units())
            .ok_or_else(|| ValidationError::out_of_range("balance", 0, i64::MAX, current))?;
        Ok(())
    }
}
