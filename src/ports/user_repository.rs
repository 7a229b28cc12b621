//! User repository port.
//!
//! Owns the account row of each chat user: identity, profile fields and the
//! ledger (balance + free-reading flag).
//!
//! # Atomicity
//!
//! `consume_entitlement` and `credit` are read-modify-write operations and
//! must be atomic per user. Two concurrent readings for the same user must
//! never both spend the free reading, nor both pass the balance check against
//! the same balance. Adapters use a transaction with a row lock, a per-user
//! lock, or a conditional update.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::ledger::{ConsumeResult, CreditAmount, Price};
use crate::domain::user::{Profile, UserAccount};

/// Aggregate numbers for the administrator `stats` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserStatistics {
    pub user_count: i64,
    pub total_balance: i64,
}

/// Repository port for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns the account, inserting a blank one on first contact.
    ///
    /// Insertion is a side effect of the read. Concurrent calls for an unseen
    /// id create exactly one record.
    async fn get_or_create(&self, id: UserId, handle: &str) -> Result<UserAccount, DomainError>;

    /// Returns the account if it exists. Never inserts.
    async fn find(&self, id: UserId) -> Result<Option<UserAccount>, DomainError>;

    /// Writes name, age and gender in one update.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the account does not exist
    async fn save_profile(&self, id: UserId, profile: &Profile) -> Result<(), DomainError>;

    /// Adds a trusted credit and returns the new balance.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the account does not exist
    async fn credit(&self, id: UserId, amount: CreditAmount) -> Result<i64, DomainError>;

    /// Atomically applies the entitlement policy for one reading.
    /// A denial carries the balance read inside the same atomic section.
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if the account does not exist
    /// - `DatabaseError` on persistence failure (never reported as `Denied`)
    async fn consume_entitlement(&self, id: UserId, price: Price)
        -> Result<ConsumeResult, DomainError>;

    /// Counts accounts and sums their balances.
    async fn statistics(&self) -> Result<UserStatistics, DomainError>;
}
