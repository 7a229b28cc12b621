//! Catalog module - the fixed deck of drawable cards.

mod card;
#[allow(clippy::module_inception)]
mod catalog;

pub use card::Card;
pub use catalog::{CardCatalog, CatalogError, SPREAD_SIZE};
