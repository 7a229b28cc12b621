//! In-memory storage adapters.
//!
//! Implementations of the storage ports that keep everything in process
//! memory. Used by tests and when no database URL is configured.
//!
//! ## Available Adapters
//!
//! - **InMemoryUserRepository** - accounts and ledger
//! - **InMemoryHistoryRepository** - reading history
//! - **InMemoryOnboardingStore** - onboarding conversations (also used in production)

mod in_memory_history_repository;
mod in_memory_onboarding_store;
mod in_memory_user_repository;

pub use in_memory_history_repository::InMemoryHistoryRepository;
pub use in_memory_onboarding_store::InMemoryOnboardingStore;
pub use in_memory_user_repository::InMemoryUserRepository;
