//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `catalog` - The immutable card deck and random draws
//! - `ledger` - Balance, free-reading allowance and the entitlement policy
//! - `user` - Accounts and demographic profiles
//! - `onboarding` - Name / age / gender capture conversation
//! - `reading` - Questions, history records and synthesis prompts

pub mod catalog;
pub mod foundation;
pub mod ledger;
pub mod onboarding;
pub mod reading;
pub mod user;
