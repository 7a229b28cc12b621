//! In-progress onboarding conversation for one user.

use serde::{Deserialize, Serialize};

use super::state::OnboardingState;
use crate::domain::foundation::{DomainError, ErrorCode, StateMachine, UserId};
use crate::domain::user::{Age, Gender, Profile};

/// What the conversation should do after an input was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingStep {
    /// Ask (again) for the name.
    AskName,
    /// Name accepted; ask for the age.
    AskAge,
    /// Age input was not a whole number; ask again.
    RetryAge,
    /// Age accepted; present the gender options.
    AskGender,
    /// Gender input was not one of the options; present them again.
    RetryGender,
    /// All fields collected. The caller persists the profile in one write.
    Completed(Profile),
}

/// Transient onboarding state. Never persisted; a restart drops it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingSession {
    user_id: UserId,
    state: OnboardingState,
    name: Option<String>,
    age: Option<Age>,
}

impl OnboardingSession {
    /// Begins a new conversation at `AwaitName`.
    pub fn start(user_id: UserId) -> Self {
        Self {
            user_id,
            state: OnboardingState::initial(),
            name: None,
            age: None,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn state(&self) -> OnboardingState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == OnboardingState::Complete
    }

    /// Applies one user input to the current state.
    ///
    /// Invalid input never moves the conversation forward; it yields a retry
    /// step instead of an error.
    ///
    /// # Errors
    ///
    /// `InvalidStateTransition` if the session is already complete.
    pub fn accept(&mut self, input: &str) -> Result<OnboardingStep, DomainError> {
        match self.state {
            OnboardingState::AwaitName => {
                let name = input.trim();
                if name.is_empty() {
                    return Ok(OnboardingStep::AskName);
                }
                self.advance(OnboardingState::AwaitAge)?;
                self.name = Some(name.to_string());
                Ok(OnboardingStep::AskAge)
            }
            OnboardingState::AwaitAge => match Age::parse(input) {
                Ok(age) => {
                    self.advance(OnboardingState::AwaitGender)?;
                    self.age = Some(age);
                    Ok(OnboardingStep::AskGender)
                }
                Err(_) => Ok(OnboardingStep::RetryAge),
            },
            OnboardingState::AwaitGender => {
                let Some(gender) = Gender::parse(input) else {
                    return Ok(OnboardingStep::RetryGender);
                };
                let profile = self.collected_profile(gender)?;
                self.advance(OnboardingState::Complete)?;
                Ok(OnboardingStep::Completed(profile))
            }
            OnboardingState::Complete => Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Onboarding already complete",
            )),
        }
    }

    fn advance(&mut self, target: OnboardingState) -> Result<(), DomainError> {
        self.state = self.state.transition_to(target).map_err(|e| {
            DomainError::new(ErrorCode::InvalidStateTransition, e.to_string())
        })?;
        Ok(())
    }

    fn collected_profile(&self, gender: Gender) -> Result<Profile, DomainError> {
        let (Some(name), Some(age)) = (self.name.as_ref(), self.age) else {
            return Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                "Gender received before name and age",
            ));
        };
        Ok(Profile::new(name.clone(), age, gender)?)
    }
}
