//! Onboarding session store port.
//!
//! Holds in-progress onboarding conversations keyed by user. Durability is
//! not required: losing a session (e.g. on restart) means the user is asked
//! for their name again on the next `start`.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::onboarding::OnboardingSession;

#[async_trait]
pub trait OnboardingSessionStore: Send + Sync {
    /// Returns the in-progress session for a user, if any.
    async fn get(&self, user_id: UserId) -> Result<Option<OnboardingSession>, DomainError>;

    /// Inserts or replaces the session for its user.
    async fn put(&self, session: OnboardingSession) -> Result<(), DomainError>;

    /// Drops the session for a user. Missing sessions are not an error.
    async fn remove(&self, user_id: UserId) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onboarding_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn OnboardingSessionStore) {}
    }
}
