//! Ledger handlers.
//!
//! ## Commands
//! - Top up a balance (trusted direct credit)
//!
//! ## Queries
//! - Aggregate statistics (admin)

mod get_stats;
mod top_up;

// Commands
pub use top_up::{TopUpCommand, TopUpHandler, TopUpResult};

// Queries
pub use get_stats::{GetStatsHandler, GetStatsQuery, GetStatsResult};
