//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations through the
//! ports. Each handler owns `Arc<dyn Port>` collaborators and exposes one
//! `handle` method.

pub mod ledger;
pub mod onboarding;
pub mod reading;
pub mod user;

pub use ledger::{GetStatsHandler, GetStatsQuery, TopUpCommand, TopUpHandler, TopUpResult};
pub use onboarding::{
    StartCommand, StartHandler, StartResult, SubmitOnboardingInputCommand,
    SubmitOnboardingInputHandler,
};
pub use reading::{
    GetHistoryHandler, GetHistoryQuery, PerformReadingCommand, PerformReadingHandler,
    PerformReadingResult,
};
pub use user::{GetAccountHandler, GetAccountQuery};
