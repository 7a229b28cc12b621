//! Reading handlers.
//!
//! ## Commands
//! - Perform a reading (entitlement, draw, synthesis, history)
//!
//! ## Queries
//! - Reading history

mod get_history;
mod perform_reading;

// Commands
pub use perform_reading::{PerformReadingCommand, PerformReadingHandler, PerformReadingResult};

// Queries
pub use get_history::{GetHistoryHandler, GetHistoryQuery, GetHistoryResult};
