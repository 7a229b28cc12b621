//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Completion backends (OpenAI-compatible HTTP, scripted mock)
//! - `catalog` - Card deck loading (bundled or JSON file)
//! - `postgres` - PostgreSQL user and history repositories
//! - `storage` - In-memory repositories and onboarding sessions
//! - `telegram` - Bot API transport

pub mod ai;
pub mod catalog;
pub mod postgres;
pub mod storage;
pub mod telegram;
