//! History repository port (append-only).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::reading::{NewReading, Reading};

/// Append-only log of completed readings.
///
/// Entries are never updated or deleted.
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Appends a reading, returning it with its store-assigned id and time.
    async fn append(&self, reading: NewReading) -> Result<Reading, DomainError>;

    /// Lists a user's readings, newest first, at most `limit` entries.
    async fn list_for_user(&self, user_id: UserId, limit: usize)
        -> Result<Vec<Reading>, DomainError>;
}
