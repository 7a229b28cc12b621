//! TopUpHandler - Trusted direct credit of the user's balance.
//!
//! There is no payment gateway: the amount typed after `topup` is credited as
//! is, provided it is a positive whole number.

use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::ledger::CreditAmount;
use crate::ports::UserRepository;

/// Command to credit a balance.
#[derive(Debug, Clone)]
pub struct TopUpCommand {
    pub user_id: UserId,
    pub handle: String,
    /// Raw amount as typed by the user.
    pub amount: String,
}

/// Result of a successful top-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopUpResult {
    pub credited: CreditAmount,
    pub balance: i64,
}

/// Handler for balance top-ups.
pub struct TopUpHandler {
    users: Arc<dyn UserRepository>,
}

impl TopUpHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// # Errors
    ///
    /// - Validation errors for a missing, non-numeric or zero amount (no
    ///   state is touched)
    /// - `DatabaseError` from the store
    pub async fn handle(&self, cmd: TopUpCommand) -> Result<TopUpResult, DomainError> {
        let credited = CreditAmount::parse(&cmd.amount)?;

        self.users.get_or_create(cmd.user_id, &cmd.handle).await?;
        let balance = self.users.credit(cmd.user_id, credited).await?;

        info!(user_id = %cmd.user_id, amount = credited.units(), balance, "Balance topped up");

        Ok(TopUpResult { credited, balance })
    }
}
