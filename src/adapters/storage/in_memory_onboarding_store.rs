//! In-Memory Onboarding Session Store
//!
//! Sessions live only as long as the process. This is the intended
//! behaviour: after a restart the user simply starts onboarding again.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::onboarding::OnboardingSession;
use crate::ports::OnboardingSessionStore;

#[derive(Debug, Clone, Default)]
pub struct InMemoryOnboardingStore {
    sessions: Arc<RwLock<HashMap<UserId, OnboardingSession>>>,
}

impl InMemoryOnboardingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations in progress.
    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl OnboardingSessionStore for InMemoryOnboardingStore {
    async fn get(&self, user_id: UserId) -> Result<Option<OnboardingSession>, DomainError> {
        Ok(self.sessions.read().await.get(&user_id).cloned())
    }

    async fn put(&self, session: OnboardingSession) -> Result<(), DomainError> {
        self.sessions.write().await.insert(session.user_id(), session);
        Ok(())
    }

    async fn remove(&self, user_id: UserId) -> Result<(), DomainError> {
        self.sessions.write().await.remove(&user_id);
        Ok(())
    }
}
