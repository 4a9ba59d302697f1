//! Raw catalog records and their normalization into `Book`

use bookrec_core::{Book, UNKNOWN_AUTHOR, UNKNOWN_TITLE};
use serde::{Deserialize, Serialize};

/// First sentence as the catalog returns it: a bare string, a list of
/// strings, or a `{ "value": ... }` object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FirstSentence {
    Text(String),
    List(Vec<String>),
    Value { value: String },
}

impl FirstSentence {
    pub fn text(&self) -> Option<&str> {
        match self {
            FirstSentence::Text(s) => Some(s),
            FirstSentence::List(list) => list.first().map(String::as_str),
            FirstSentence::Value { value } => Some(value),
        }
    }
}

/// One search document from the catalog, every field optional
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct RawRecord {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    #[serde(default)]
    pub author_key: Vec<String>,
    #[serde(default)]
    pub subject: Vec<String>,
    #[serde(default)]
    pub first_publish_year: Option<i32>,
    #[serde(default)]
    pub first_sentence: Option<FirstSentence>,
    #[serde(default)]
    pub cover_i: Option<i64>,
}

impl RawRecord {
    /// Validate once at the boundary: fill defaults, keep the first author,
    /// lowercase and trim subjects into the genre set.
    pub fn into_book(self) -> Book {
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());
        let author = self
            .author_name
            .into_iter()
            .map(|a| a.trim().to_string())
            .find(|a| !a.is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());
        let description = self
            .first_sentence
            .as_ref()
            .and_then(FirstSentence::text)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        // "/works/OL27482W" -> "OL27482W"
        let id = self
            .key
            .as_deref()
            .and_then(|k| k.rsplit('/').next())
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        Book {
            id,
            title,
            author,
            year: self.first_publish_year,
            genres: self
                .subject
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            description,
            cover_id: self.cover_i.map(|c| c.to_string()),
        }
    }
}

impl From<RawRecord> for Book {
    fn from(record: RawRecord) -> Self {
        record.into_book()
    }
}
