//! In-Memory User Repository Adapter
//!
//! Keeps accounts in a map guarded by a single async `RwLock`. Every
//! read-modify-write runs under the write guard, which makes the entitlement
//! check atomic per user (and, more coarsely, across users).

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::ledger::{ConsumeResult, CreditAmount, Price};
use crate::domain::user::{Profile, UserAccount};
use crate::ports::{UserRepository, UserStatistics};

/// In-memory account storage for tests and store-less local runs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    accounts: Arc<RwLock<HashMap<UserId, UserAccount>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces an account wholesale (test seeding).
    pub async fn insert(&self, account: UserAccount) {
        self.accounts.write().await.insert(account.id, account);
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }
}

fn not_found(id: UserId) -> DomainError {
    DomainError::new(ErrorCode::UserNotFound, format!("User {} not found", id))
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_or_create(&self, id: UserId, handle: &str) -> Result<UserAccount, DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .entry(id)
            .or_insert_with(|| UserAccount::new(id, handle));
        Ok(account.clone())
    }

    async fn find(&self, id: UserId) -> Result<Option<UserAccount>, DomainError> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn save_profile(&self, id: UserId, profile: &Profile) -> Result<(), DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or_else(|| not_found(id))?;
        account.apply_profile(profile);
        Ok(())
    }

    async fn credit(&self, id: UserId, amount: CreditAmount) -> Result<i64, DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or_else(|| not_found(id))?;
        account.ledger.credit(amount)?;
        Ok(account.ledger.balance)
    }

    async fn consume_entitlement(
        &self,
        id: UserId,
        price: Price,
    ) -> Result<ConsumeResult, DomainError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(&id).ok_or_else(|| not_found(id))?;
        Ok(account.ledger.consume(price))
    }

    async fn statistics(&self) -> Result<UserStatistics, DomainError> {
        let accounts = self.accounts.read().await;
        Ok(UserStatistics {
            user_count: accounts.len() as i64,
            total_balance: accounts.values().map(|a| a.ledger.balance).sum(),
        })
    }
}
