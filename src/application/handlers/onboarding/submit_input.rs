//! SubmitOnboardingInputHandler - Feeds free text or a button choice into
//! the user's onboarding session.
//!
//! The profile is written in one update when the last field arrives. If that
//! write fails the stored session is left as it was, so the user can simply
//! answer the last question again.

use std::sync::Arc;
use tracing::info;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::onboarding::OnboardingStep;
use crate::ports::{OnboardingSessionStore, UserRepository};

/// Command carrying one onboarding answer.
#[derive(Debug, Clone)]
pub struct SubmitOnboardingInputCommand {
    pub user_id: UserId,
    pub input: String,
}

/// `None` when the user has no onboarding in progress.
pub type SubmitOnboardingInputResult = Option<OnboardingStep>;

/// Handler for onboarding answers.
pub struct SubmitOnboardingInputHandler {
    users: Arc<dyn UserRepository>,
    sessions: Arc<dyn OnboardingSessionStore>,
}

impl SubmitOnboardingInputHandler {
    pub fn new(users: Arc<dyn UserRepository>, sessions: Arc<dyn OnboardingSessionStore>) -> Self {
        Self { users, sessions }
    }

    pub async fn handle(
        &self,
        cmd: SubmitOnboardingInputCommand,
    ) -> Result<SubmitOnboardingInputResult, DomainError> {
        let Some(mut session) = self.sessions.get(cmd.user_id).await? else {
            return Ok(None);
        };

        let step = session.accept(&cmd.input)?;

        match &step {
            OnboardingStep::Completed(profile) => {
                self.users.save_profile(cmd.user_id, profile).await?;
                self.sessions.remove(cmd.user_id).await?;
                info!(user_id = %cmd.user_id, "Onboarding completed");
            }
            _ => self.sessions.put(session).await?,
        }

        Ok(Some(step))
    }
}
