//! Prompt texts for answer synthesis and the offline template.

use crate::domain::catalog::Card;
use crate::domain::user::UserAccount;

use super::reading::Question;

/// Persona given to the completion backend.
pub const SYSTEM_PROMPT: &str =
    "You are an experienced tarot reader. You answer briefly and to the point.";

/// Answer used when the backend is configured but does not deliver.
pub const UNAVAILABLE_ANSWER: &str = "Could not obtain an answer from the oracle.";

const NOT_SPECIFIED: &str = "not specified";

/// Deterministic answer used when no backend is configured.
pub fn offline_answer(question: &Question, cards: &[Card]) -> String {
    format!(
        "In answer to your question '{}', the cards {} suggest that you stand at a crossroads. \
         Trust your intuition and move forward.",
        question,
        join_names(cards)
    )
}

/// User message embedding the profile, question and drawn cards.
pub fn user_prompt(question: &Question, cards: &[Card], profile: &UserAccount) -> String {
    let name = profile.name.as_deref().unwrap_or(NOT_SPECIFIED);
    let age = profile
        .age
        .map(|a| a.to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string());
    let gender = profile.gender.map(|g| g.label()).unwrap_or(NOT_SPECIFIED);
    let spread = cards
        .iter()
        .map(|c| format!("{} - {}", c.name, c.description))
        .collect::<Vec<_>>()
        .join("; ");

    format!(
        "Name: {}\nAge: {}\nGender: {}\nQuestion: {}\nCards: {}",
        name, age, gender, question, spread
    )
}

/// "A, B and C" style listing of card names.
fn join_names(cards: &[Card]) -> String {
    match cards {
        [] => String::new(),
        [only] => only.name.clone(),
        [init @ .., last] => {
            let head = init
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            format!("{} and {}", head, last.name)
        }
    }
}
