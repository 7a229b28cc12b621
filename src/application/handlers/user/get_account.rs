//! GetAccountHandler - Query behind `balance` and `profile`.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::UserAccount;
use crate::ports::UserRepository;

/// Query for the caller's account.
#[derive(Debug, Clone)]
pub struct GetAccountQuery {
    pub user_id: UserId,
    pub handle: String,
}

/// Handler returning the caller's account, registering it on first contact.
pub struct GetAccountHandler {
    users: Arc<dyn UserRepository>,
}

impl GetAccountHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, query: GetAccountQuery) -> Result<UserAccount, DomainError> {
        self.users.get_or_create(query.user_id, &query.handle).await
    }
}
