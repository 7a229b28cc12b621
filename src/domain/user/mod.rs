//! User module - account identity, demographic profile and ledger state.
//!
//! # Domain Invariants
//!
//! 1. One account per platform user id, created on first contact
//! 2. Name, age and gender are written together, once
//! 3. Accounts are never deleted

mod account;
mod profile;

pub use account::UserAccount;
pub use profile::{Age, Gender, Profile};
