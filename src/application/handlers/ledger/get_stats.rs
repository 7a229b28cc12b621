//! GetStatsHandler - Administrator query for user count and total balance.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{UserRepository, UserStatistics};

/// Query for aggregate statistics.
#[derive(Debug, Clone)]
pub struct GetStatsQuery {
    pub requester: UserId,
}

/// `None` when the requester is not the administrator.
pub type GetStatsResult = Option<UserStatistics>;

/// Handler for the `stats` command.
///
/// Only the configured administrator gets an answer. With no administrator
/// configured nobody does.
pub struct GetStatsHandler {
    users: Arc<dyn UserRepository>,
    admin: Option<UserId>,
}

impl GetStatsHandler {
    pub fn new(users: Arc<dyn UserRepository>, admin: Option<UserId>) -> Self {
        Self { users, admin }
    }

    pub async fn handle(&self, query: GetStatsQuery) -> Result<GetStatsResult, DomainError> {
        if self.admin != Some(query.requester) {
            return Ok(None);
        }

        self.users.statistics().await.map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryUserRepository;
    use crate::domain::ledger::CreditAmount;

    async fn seeded() -> InMemoryUserRepository {
        let users = InMemoryUserRepository::new();
        for (id, amount) in [(1, 100), (2, 250)] {
            users.get_or_create(UserId::new(id), "u").await.unwrap();
            users
                .credit(UserId::new(id), CreditAmount::new(amount).unwrap())
                .await
                .unwrap();
        }
        users.get_or_create(UserId::new(3), "u").await.unwrap();
        users
    }

    #[tokio::test]
    async fn admin_sees_totals() {
        let handler = GetStatsHandler::new(Arc::new(seeded().await), Some(UserId::new(1)));

        let stats = handler
            .handle(GetStatsQuery {
                requester: UserId::new(1),
            })
            .await
            .unwrap()
            .unwrap();

        assert_eq!(stats.user_count, 3);
        assert_eq!(stats.total_balance, 350);
    }

    #[tokio::test]
    async fn non_admin_gets_nothing() {
        let handler = GetStatsHandler::new(Arc::new(seeded().await), Some(UserId::new(1)));

        let result = handler
            .handle(GetStatsQuery {
                requester: UserId::new(2),
            })
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn no_admin_configured_means_nobody() {
        let handler = GetStatsHandler::new(Arc::new(seeded().await), None);

        let result = handler
            .handle(GetStatsQuery {
                requester: UserId::new(1),
            })
            .await
            .unwrap();

        assert!(result.is_none());
    }
}
