//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `UserRepository` - Accounts, profiles and the entitlement ledger
//! - `HistoryRepository` - Append-only reading history
//! - `OnboardingSessionStore` - Transient onboarding conversations
//!
//! ## External Service Ports
//!
//! - `AIProvider` - Text-completion backend used for answer synthesis

mod ai_provider;
mod history_repository;
mod onboarding_store;
mod user_repository;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, Message, MessageRole,
    ProviderInfo,
};
pub use history_repository::HistoryRepository;
pub use onboarding_store::OnboardingSessionStore;
pub use user_repository::{UserRepository, UserStatistics};
