//! Onboarding state machine.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Step of the name → age → gender conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnboardingState {
    AwaitName,
    AwaitAge,
    AwaitGender,
    Complete,
}

impl OnboardingState {
    /// State entered by the entry command.
    pub fn initial() -> Self {
        OnboardingState::AwaitName
    }
}

impl StateMachine for OnboardingState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use OnboardingState::*;
        matches!(
            (self, target),
            (AwaitName, AwaitAge) | (AwaitAge, AwaitGender) | (AwaitGender, Complete)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use OnboardingState::*;
        match self {
            AwaitName => vec![AwaitAge],
            AwaitAge => vec![AwaitGender],
            AwaitGender => vec![Complete],
            Complete => vec![],
        }
    }
}

impl fmt::Display for OnboardingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OnboardingState::AwaitName => "await_name",
            OnboardingState::AwaitAge => "await_age",
            OnboardingState::AwaitGender => "await_gender",
            OnboardingState::Complete => "complete",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use OnboardingState::*;

    #[test]
    fn progression_is_strictly_forward() {
        assert_eq!(AwaitName.transition_to(AwaitAge), Ok(AwaitAge));
        assert_eq!(AwaitAge.transition_to(AwaitGender), Ok(AwaitGender));
        assert_eq!(AwaitGender.transition_to(Complete), Ok(Complete));
    }

    #[test]
    fn steps_cannot_be_skipped() {
        assert!(AwaitName.transition_to(AwaitGender).is_err());
        assert!(AwaitName.transition_to(Complete).is_err());
        assert!(AwaitAge.transition_to(Complete).is_err());
    }

    #[test]
    fn no_backward_transitions() {
        assert!(AwaitAge.transition_to(AwaitName).is_err());
        assert!(Complete.transition_to(AwaitName).is_err());
    }

    #[test]
    fn only_complete_is_terminal() {
        assert!(Complete.is_terminal());
        for state in [AwaitName, AwaitAge, AwaitGender] {
            assert!(!state.is_terminal());
        }
    }

    #[test]
    fn initial_state_awaits_name() {
        assert_eq!(OnboardingState::initial(), AwaitName);
    }
}
