//! User handlers.
//!
//! ## Queries
//! - Account lookup (balance and profile views)

mod get_account;

pub use get_account::{GetAccountHandler, GetAccountQuery};
