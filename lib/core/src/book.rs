use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One catalog entry.
///
/// `description` and `genres` always exist on a constructed `Book`; a
/// missing value in serialized input deserializes to the empty string /
/// empty set. Only the first listed author is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    /// Catalog-assigned identity key, used for deduplication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_author")]
    pub author: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,

    #[serde(default)]
    pub genres: BTreeSet<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<String>,
}

pub const UNKNOWN_TITLE: &str = "Unknown Title";
pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

fn default_title() -> String {
    UNKNOWN_TITLE.to_string()
}

fn default_author() -> String {
    UNKNOWN_AUTHOR.to_string()
}

impl Default for Book {
    fn default() -> Self {
        Self {
            id: None,
            title: default_title(),
            author: default_author(),
            year: None,
            genres: BTreeSet::new(),
            description: String::new(),
            cover_id: None,
        }
    }
}

impl Book {
    #[must_use]
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            ..Self::default()
        }
    }

    /// Identity key for deduplication, if the catalog provided one
    #[inline]
    pub fn key(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_cover_id(mut self, cover_id: impl Into<String>) -> Self {
        self.cover_id = Some(cover_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let book: Book = serde_json::from_str(r#"{"id": "OL1W"}"#).unwrap();
        assert_eq!(book.key(), Some("OL1W"));
        assert_eq!(book.title, UNKNOWN_TITLE);
        assert_eq!(book.author, UNKNOWN_AUTHOR);
        assert!(book.description.is_empty());
        assert!(book.genres.is_empty());
        assert_eq!(book.year, None);
    }

    #[test]
    fn test_builder() {
        let book = Book::new("Dune", "Frank Herbert")
            .with_id("OL893415W")
            .with_year(1965)
            .with_genres(["science fiction", "classic"])
            .with_description("Spice and sand");
        assert_eq!(book.genres.len(), 2);
        assert_eq!(book.year, Some(1965));
        assert!(book.cover_id.is_none());
    }
}
