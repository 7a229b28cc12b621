//! Demographic profile values captured during onboarding.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Gender selection offered during onboarding.
///
/// The bot presents exactly these two options; the store keeps the short code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    /// All selectable options, in presentation order.
    pub const OPTIONS: [Gender; 2] = [Gender::Male, Gender::Female];

    /// Short code used in storage and button callbacks.
    pub fn code(&self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }

    /// Parses a stored code or a typed label (case-insensitive).
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "m" | "male" => Some(Gender::Male),
            "f" | "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Gender {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gender::parse(s).ok_or_else(|| ValidationError::invalid_format("gender", "expected M or F"))
    }
}

/// Age in whole years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Age(u32);

impl Age {
    /// Wraps a known-valid age.
    pub fn new(years: u32) -> Self {
        Self(years)
    }

    /// Parses chat input. Only plain ASCII digits are accepted.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::empty_field("age"));
        }
        if !input.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::invalid_format("age", "expected a whole number"));
        }
        input
            .parse::<u32>()
            .map(Self)
            .map_err(|e| ValidationError::invalid_format("age", e.to_string()))
    }

    pub fn years(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Profile fields written in a single step when onboarding completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub age: Age,
    pub gender: Gender,
}

impl Profile {
    /// Creates a profile, rejecting a blank name.
    pub fn new(name: impl Into<String>, age: Age, gender: Gender) -> Result<Self, ValidationError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self { name, age, gender })
    }
}
