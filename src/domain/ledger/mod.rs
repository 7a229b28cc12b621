//! Ledger module - per-user balance and the free-reading allowance.
//!
//! # Domain Invariants
//!
//! 1. `balance >= 0` whenever the state is at rest
//! 2. `free_used` flips from false to true at most once
//! 3. A denied check leaves the state untouched

mod entitlement;
mod money;

pub use entitlement::{ConsumeResult, GrantVia, LedgerState};
pub use money::{CreditAmount, Price};
