//! In-Memory History Repository Adapter

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ReadingId, Timestamp, UserId};
use crate::domain::reading::{NewReading, Reading};
use crate::ports::HistoryRepository;

/// Append-only in-memory history with autoincrement ids.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryRepository {
    rows: Arc<RwLock<Vec<Reading>>>,
}

impl InMemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// All stored rows in insertion order.
    pub async fn all(&self) -> Vec<Reading> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl HistoryRepository for InMemoryHistoryRepository {
    async fn append(&self, reading: NewReading) -> Result<Reading, DomainError> {
        let mut rows = self.rows.write().await;
        let id = ReadingId::new(rows.len() as i64 + 1);
        let stored = Reading::from_new(id, reading, Timestamp::now());
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> Result<Vec<Reading>, DomainError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .take(limit)
            .cloned()
            .collect())
    }
}
