//! Card value object.

use serde::{Deserialize, Serialize};

/// A drawable card: unique name, interpretive description, optional image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Card {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Image reference, treating an empty string as absent.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref().filter(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_without_image() {
        let card: Card =
            serde_json::from_str(r#"{"name":"The Fool","description":"Beginnings"}"#).unwrap();
        assert_eq!(card.name, "The Fool");
        assert!(card.image().is_none());
    }

    #[test]
    fn empty_image_counts_as_absent() {
        let card: Card = serde_json::from_str(
            r#"{"name":"The Fool","description":"Beginnings","image":""}"#,
        )
        .unwrap();
        assert!(card.image().is_none());
    }

    #[test]
    fn with_image_sets_reference() {
        let card = Card::new("The Sun", "Joy").with_image("https://img.example/sun.jpg");
        assert_eq!(card.image(), Some("https://img.example/sun.jpg"));
    }
}
