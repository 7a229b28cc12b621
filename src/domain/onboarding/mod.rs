//! Onboarding module - name, age and gender capture for new users.
//!
//! `AwaitName → AwaitAge → AwaitGender → Complete`. Invalid input keeps the
//! current state; there is no cancellation.

mod session;
mod state;

pub use session::{OnboardingSession, OnboardingStep};
pub use state::OnboardingState;
