//! StartHandler - Entry point of the conversation.
//!
//! Registers the user on first contact. Users without a name are (re)entered
//! into onboarding at `AwaitName`; everyone else gets the welcome.

use std::sync::Arc;
use tracing::debug;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::onboarding::OnboardingSession;
use crate::domain::user::UserAccount;
use crate::ports::{OnboardingSessionStore, UserRepository};

/// Command issued by `start`.
#[derive(Debug, Clone)]
pub struct StartCommand {
    pub user_id: UserId,
    pub handle: String,
}

/// Outcome of `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartResult {
    /// A fresh onboarding session was opened; ask for the name.
    OnboardingStarted,
    /// The profile is already complete.
    Welcome { account: UserAccount },
}

/// Handler for the `start` command.
pub struct StartHandler {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn OnboardingSessionStore>,
}

impl StartHandler {
    pub fn new(users: Arc<dyn UserRepository>, sessions: Arc<dyn OnboardingSessionStore>) -> Self {
        Self { users, sessions }
    }

    pub async fn handle(&self, cmd: StartCommand) -> Result<StartResult, DomainError> {
        let account = self.users.get_or_create(cmd.user_id, &cmd.handle).await?;

        if account.name.is_some() {
            return Ok(StartResult::Welcome { account });
        }

        // Replaces any half-finished session.
        self.sessions.put(OnboardingSession::start(cmd.user_id)).await?;
        debug!(user_id = %cmd.user_id, "Onboarding started");

        Ok(StartResult::OnboardingStarted)
    }
}
