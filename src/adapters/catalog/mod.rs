//! Card catalog sources.
//!
//! The deck is either read from a configured JSON file or taken from the
//! built-in major arcana bundled into the binary. Either way it is parsed and
//! validated once at startup.

use once_cell::sync::Lazy;
use std::path::Path;
use tracing::info;

use crate::domain::catalog::{CardCatalog, CatalogError};

/// Built-in deck definition, embedded at compile time.
const BUILTIN_DECK_JSON: &str = include_str!("../../../data/cards.json");

static BUILTIN_DECK: Lazy<Result<CardCatalog, CatalogError>> =
    Lazy::new(|| CardCatalog::from_json(BUILTIN_DECK_JSON));

/// Returns the bundled deck.
pub fn builtin_catalog() -> Result<CardCatalog, CatalogError> {
    BUILTIN_DECK.clone()
}

/// Loads the deck from `path`, or the bundled deck when no path is set.
///
/// # Errors
///
/// - `Unreadable` if the file cannot be read
/// - `Parse` / `TooFewCards` / `DuplicateName` on a malformed definition
pub async fn load_catalog(path: Option<&Path>) -> Result<CardCatalog, CatalogError> {
    let catalog = match path {
        Some(path) => {
            let json = tokio::fs::read_to_string(path).await.map_err(|e| {
                CatalogError::Unreadable {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                }
            })?;
            let catalog = CardCatalog::from_json(&json)?;
            info!(path = %path.display(), cards = catalog.len(), "Loaded card catalog from file");
            catalog
        }
        None => {
            let catalog = builtin_catalog()?;
            info!(cards = catalog.len(), "Using built-in card catalog");
            catalog
        }
    };

    Ok(catalog)
}
