//! GetHistoryHandler - Most recent readings of the caller.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::reading::Reading;
use crate::ports::HistoryRepository;

/// Query for a user's history.
#[derive(Debug, Clone)]
pub struct GetHistoryQuery {
    pub user_id: UserId,
}

/// Readings, newest first.
pub type GetHistoryResult = Vec<Reading>;

/// Handler for the `history` command.
pub struct GetHistoryHandler {
    history: Arc<dyn HistoryRepository>,
    limit: usize,
}

impl GetHistoryHandler {
    pub fn new(history: Arc<dyn HistoryRepository>, limit: usize) -> Self {
        Self { history, limit }
    }

    pub async fn handle(&self, query: GetHistoryQuery) -> Result<GetHistoryResult, DomainError> {
        self.history.list_for_user(query.user_id, self.limit).await
    }
}
