//! User account aggregate.

use serde::{Deserialize, Serialize};

use super::profile::{Age, Gender, Profile};
use crate::domain::foundation::UserId;
use crate::domain::ledger::LedgerState;

/// A chat user as known to the bot.
///
/// Created with empty profile fields on first contact and never deleted.
/// Profile fields are written once by onboarding; the ledger is mutated only
/// through the entitlement and credit operations of the user repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub handle: String,
    pub name: Option<String>,
    pub age: Option<Age>,
    pub gender: Option<Gender>,
    pub ledger: LedgerState,
}

impl UserAccount {
    /// Creates a fresh account: no profile, zero balance, free reading unused.
    pub fn new(id: UserId, handle: impl Into<String>) -> Self {
        Self {
            id,
            handle: handle.into(),
            name: None,
            age: None,
            gender: None,
            ledger: LedgerState::default(),
        }
    }

    /// True once onboarding has stored a name.
    pub fn is_onboarded(&self) -> bool {
        self.name.is_some()
    }

    /// Writes all onboarding fields at once.
    pub fn apply_profile(&mut self, profile: &Profile) {
        self.name = Some(profile.name.clone());
        self.age = Some(profile.age);
        self.gender = Some(profile.gender);
    }

    pub fn balance(&self) -> i64 {
        self.ledger.balance
    }

    pub fn free_used(&self) -> bool {
        self.ledger.free_used
    }
}
