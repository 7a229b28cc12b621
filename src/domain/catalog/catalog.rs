//! Immutable card catalog with uniform draws without replacement.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use thiserror::Error;

use super::card::Card;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::reading::CARD_SEPARATOR;

/// Number of cards laid out for one reading.
pub const SPREAD_SIZE: usize = 3;

/// Errors raised while building or drawing from a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog needs at least {required} cards, found {found}")]
    TooFewCards { required: usize, found: usize },

    #[error("duplicate card name '{0}'")]
    DuplicateName(String),

    #[error("card at position {0} has an empty name")]
    EmptyName(usize),

    #[error("card name '{0}' contains the history separator")]
    SeparatorInName(String),

    #[error("cannot draw {requested} cards from a catalog of {available}")]
    DrawTooLarge { requested: usize, available: usize },

    #[error("invalid catalog definition: {0}")]
    Parse(String),

    #[error("cannot read catalog source {path}: {reason}")]
    Unreadable { path: String, reason: String },
}

impl From<CatalogError> for DomainError {
    fn from(err: CatalogError) -> Self {
        DomainError::new(ErrorCode::CatalogIntegrity, err.to_string())
    }
}

/// The fixed set of drawable cards.
///
/// Built once at startup and shared read-only; there is no mutation API.
#[derive(Debug, Clone)]
pub struct CardCatalog {
    cards: Vec<Card>,
}

impl CardCatalog {
    /// Validates and wraps a card list.
    ///
    /// # Errors
    ///
    /// - `TooFewCards` if fewer than [`SPREAD_SIZE`] cards are given
    /// - `DuplicateName` / `EmptyName` on malformed entries
    /// - `SeparatorInName` if a name would not survive the history column
    pub fn new(cards: Vec<Card>) -> Result<Self, CatalogError> {
        if cards.len() < SPREAD_SIZE {
            return Err(CatalogError::TooFewCards {
                required: SPREAD_SIZE,
                found: cards.len(),
            });
        }

        let mut seen = HashSet::with_capacity(cards.len());
        for (index, card) in cards.iter().enumerate() {
            if card.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(index));
            }
            if card.name.contains(CARD_SEPARATOR) {
                return Err(CatalogError::SeparatorInName(card.name.clone()));
            }
            if !seen.insert(card.name.as_str()) {
                return Err(CatalogError::DuplicateName(card.name.clone()));
            }
        }

        Ok(Self { cards })
    }

    /// Parses a JSON array of `{name, description, image?}` objects.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let cards: Vec<Card> =
            serde_json::from_str(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::new(cards)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Looks a card up by its unique name.
    pub fn find(&self, name: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.name == name)
    }

    /// Draws `n` distinct cards uniformly at random, in draw order.
    pub fn sample_with<R: Rng + ?Sized>(
        &self,
        n: usize,
        rng: &mut R,
    ) -> Result<Vec<Card>, CatalogError> {
        if n > self.cards.len() {
            return Err(CatalogError::DrawTooLarge {
                requested: n,
                available: self.cards.len(),
            });
        }

        let mut indices: Vec<usize> = (0..self.cards.len()).collect();
        let (drawn, _) = indices.partial_shuffle(rng, n);
        Ok(drawn.iter().map(|&i| self.cards[i].clone()).collect())
    }

    /// Draws `n` distinct cards using the thread-local RNG.
    pub fn sample(&self, n: usize) -> Result<Vec<Card>, CatalogError> {
        self.sample_with(n, &mut rand::thread_rng())
    }
}
