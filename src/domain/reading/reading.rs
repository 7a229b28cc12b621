//! Reading history records.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::catalog::{Card, SPREAD_SIZE};
use crate::domain::foundation::{ReadingId, Timestamp, UserId, ValidationError};

/// Separator used when card names are stored as one column.
pub const CARD_SEPARATOR: &str = ",";

/// The free-text question a reading answers. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Question(String);

impl Question {
    pub fn new(text: impl AsRef<str>) -> Result<Self, ValidationError> {
        let text = text.as_ref().trim();
        if text.is_empty() {
            return Err(ValidationError::empty_field("question"));
        }
        Ok(Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Question {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A completed reading about to be appended to the history log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReading {
    pub user_id: UserId,
    pub question: Question,
    /// Card names in draw order.
    pub cards: Vec<String>,
    pub answer: String,
}

impl NewReading {
    pub fn new(
        user_id: UserId,
        question: Question,
        cards: &[Card],
        answer: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        if cards.len() != SPREAD_SIZE {
            return Err(ValidationError::out_of_range(
                "cards",
                SPREAD_SIZE as i64,
                SPREAD_SIZE as i64,
                cards.len() as i64,
            ));
        }
        Ok(Self {
            user_id,
            question,
            cards: cards.iter().map(|c| c.name.clone()).collect(),
            answer: answer.into(),
        })
    }

    /// Card names joined for single-column storage.
    pub fn cards_joined(&self) -> String {
        self.cards.join(CARD_SEPARATOR)
    }
}

/// An immutable history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    pub id: ReadingId,
    pub user_id: UserId,
    pub question: String,
    pub cards: Vec<String>,
    pub answer: String,
    pub created_at: Timestamp,
}

impl Reading {
    /// Materializes a stored row.
    pub fn from_new(id: ReadingId, new: NewReading, created_at: Timestamp) -> Self {
        Self {
            id,
            user_id: new.user_id,
            question: new.question.as_str().to_string(),
            cards: new.cards,
            answer: new.answer,
            created_at,
        }
    }

    /// Splits a stored comma-joined card column.
    pub fn split_cards(joined: &str) -> Vec<String> {
        joined
            .split(CARD_SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}
