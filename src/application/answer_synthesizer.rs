//! AnswerSynthesizer - turns a spread and a question into reading text.
//!
//! Never fails. Without a configured backend it uses the deterministic
//! offline template; with one, any backend failure degrades to the fixed
//! unavailable answer.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::catalog::Card;
use crate::domain::reading::prompt::{offline_answer, user_prompt, SYSTEM_PROMPT, UNAVAILABLE_ANSWER};
use crate::domain::reading::Question;
use crate::domain::user::UserAccount;
use crate::ports::{AIProvider, CompletionRequest, MessageRole};

/// Produces the answer text for a reading.
#[derive(Clone)]
pub struct AnswerSynthesizer {
    provider: Option<Arc<dyn AIProvider>>,
}

impl AnswerSynthesizer {
    /// Uses `provider` when present, the offline template otherwise.
    pub fn new(provider: Option<Arc<dyn AIProvider>>) -> Self {
        Self { provider }
    }

    /// Synthesizer with no backend.
    pub fn offline() -> Self {
        Self::new(None)
    }

    /// Synthesizer backed by a completion provider.
    pub fn with_provider(provider: Arc<dyn AIProvider>) -> Self {
        Self::new(Some(provider))
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    /// Produces the answer for `cards` drawn for `question`.
    pub async fn synthesize(
        &self,
        question: &Question,
        cards: &[Card],
        profile: &UserAccount,
    ) -> String {
        let Some(provider) = self.provider.as_ref() else {
            return offline_answer(question, cards);
        };

        let request = CompletionRequest::new(profile.id)
            .with_system_prompt(SYSTEM_PROMPT)
            .with_message(MessageRole::User, user_prompt(question, cards, profile));

        match provider.complete(request).await {
            Ok(response) => {
                debug!(
                    user_id = %profile.id,
                    model = %response.model,
                    "Answer synthesized"
                );
                response.content
            }
            Err(e) => {
                warn!(
                    user_id = %profile.id,
                    provider = %provider.provider_info().name,
                    error = %e,
                    "Answer synthesis failed, using fallback answer"
                );
                UNAVAILABLE_ANSWER.to_string()
            }
        }
    }
}

impl std::fmt::Debug for AnswerSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerSynthesizer")
            .field("configured", &self.is_configured())
            .finish()
    }
}
