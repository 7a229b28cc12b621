//! Onboarding handlers.
//!
//! ## Commands
//! - `start`: register the user and open onboarding when the profile is empty
//! - Submitting a name, age or gender answer

mod start;
mod submit_input;

pub use start::{StartCommand, StartHandler, StartResult};
pub use submit_input::{
    SubmitOnboardingInputCommand, SubmitOnboardingInputHandler, SubmitOnboardingInputResult,
};
