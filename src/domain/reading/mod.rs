//! Reading module - questions, history records and synthesis prompts.

pub mod prompt;
#[allow(clippy::module_inception)]
mod reading;

pub use reading::{NewReading, Question, Reading, CARD_SEPARATOR};
