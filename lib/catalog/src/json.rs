//! Catalog backed by a JSON file of search documents

use crate::era::Era;
use crate::record::RawRecord;
use crate::Catalog;
use ahash::AHashSet;
use bookrec_core::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Accepts a bare array or a search response with a `docs` list
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Records(Vec<RawRecord>),
    Search { docs: Vec<RawRecord> },
}

/// In-memory catalog loaded from JSON
#[derive(Debug, Clone, Default)]
pub struct JsonCatalog {
    records: Vec<RawRecord>,
}

impl JsonCatalog {
    pub fn new(records: Vec<RawRecord>) -> Self {
        Self { records }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let records = match serde_json::from_str::<CatalogFile>(json)? {
            CatalogFile::Records(records) => records,
            CatalogFile::Search { docs } => docs,
        };
        Ok(Self::new(records))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let catalog = Self::from_json(&fs::read_to_string(path)?)?;
        debug!(path = %path.display(), records = catalog.len(), "loaded catalog");
        Ok(catalog)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[inline]
    pub fn records(&self) -> &[RawRecord] {
        &self.records
    }
}

/// A parsed lookup query
#[derive(Debug, Default, PartialEq)]
struct Query {
    words: Vec<String>,
    eras: Vec<Era>,
}

impl Query {
    /// Split on whitespace and `_`. A `START-END` token constrains the
    /// publication year; every other token contributes lowercase words.
    fn parse(query: &str) -> Self {
        let mut parsed = Query::default();
        for token in query.split(|c: char| c.is_whitespace() || c == '_') {
            if token.is_empty() {
                continue;
            }
            if token.starts_with(|c: char| c.is_ascii_digit()) {
                if let Ok(era) = token.parse::<Era>() {
                    parsed.eras.push(era);
                    continue;
                }
            }
            parsed.words.extend(words(token));
        }
        parsed
    }

    /// Every word appears as a whole word in the title, an author name or a
    /// subject, and the publication year falls inside every era
    fn matches(&self, record: &RawRecord) -> bool {
        let in_eras = self.eras.iter().all(|era| {
            record
                .first_publish_year
                .is_some_and(|year| era.contains(year))
        });
        if !in_eras {
            return false;
        }
        if self.words.is_empty() {
            return true;
        }

        let haystack: AHashSet<String> = record
            .title
            .iter()
            .chain(&record.author_name)
            .chain(&record.subject)
            .flat_map(|field| words(field))
            .collect();
        self.words.iter().all(|w| haystack.contains(w))
    }
}

fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

impl Catalog for JsonCatalog {
    fn lookup(&self, query: &str, limit: usize) -> Result<Vec<RawRecord>> {
        let query = Query::parse(query);
        Ok(self
            .records
            .iter()
            .filter(|r| query.matches(r))
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SEARCH_RESPONSE: &str = r#"{
        "numFound": 3,
        "docs": [
            {"key": "/works/OL1W", "title": "The Hobbit", "author_name": ["J.R.R. Tolkien"],
             "subject": ["Fantasy"]},
            {"key": "/works/OL2W", "title": "Dune", "author_name": ["Frank Herbert"],
             "subject": ["Science fiction"]},
            {"key": "/works/OL3W", "title": "Foundation", "author_name": ["Isaac Asimov"],
             "subject": ["Science fiction"]}
        ]
    }"#;

    #[test]
    fn test_load_search_response() {
        let catalog = JsonCatalog::from_json(SEARCH_RESPONSE).unwrap();
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn test_load_array_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"title": "Emma"}}, {{}}]"#).unwrap();
        let catalog = JsonCatalog::load(file.path()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.records()[1].title, None);
    }

    #[test]
    fn test_lookup_matches_all_words() {
        let catalog = JsonCatalog::from_json(SEARCH_RESPONSE).unwrap();
        assert_eq!(catalog.lookup("science fiction", 10).unwrap().len(), 2);
        assert_eq!(catalog.lookup("science_fiction asimov", 10).unwrap().len(), 1);
        assert_eq!(catalog.lookup("TOLKIEN", 10).unwrap().len(), 1);
        assert!(catalog.lookup("romance", 10).unwrap().is_empty());
    }

    #[test]
    fn test_lookup_matches_whole_words() {
        let catalog = JsonCatalog::from_json(
            r#"[{"title": "Mary Stuart", "author_name": ["Friedrich Schiller"],
                "subject": ["Drama"]}]"#,
        )
        .unwrap();
        assert!(catalog.lookup("art", 10).unwrap().is_empty());
        assert!(catalog.lookup("dram", 10).unwrap().is_empty());
        assert_eq!(catalog.lookup("stuart drama", 10).unwrap().len(), 1);
    }

    #[test]
    fn test_lookup_era_token_filters_by_year() {
        let catalog = JsonCatalog::from_json(
            r#"[
                {"key": "/works/A", "subject": ["History", "Fiction"], "first_publish_year": 1930},
                {"key": "/works/B", "subject": ["History", "Fiction"], "first_publish_year": 1950},
                {"key": "/works/C", "subject": ["History", "Fiction"]}
            ]"#,
        )
        .unwrap();

        let hits = catalog.lookup("history_fiction_1921-1940", 10).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].key.as_deref(), Some("/works/A"));
        assert_eq!(catalog.lookup("1941-1960", 10).unwrap().len(), 1);
        assert_eq!(catalog.lookup("history fiction", 10).unwrap().len(), 3);
    }

    #[test]
    fn test_query_parsing() {
        let query = Query::parse("Science_Fiction 2001-2020 sci-fi");
        assert_eq!(query.words, vec!["science", "fiction", "sci", "fi"]);
        assert_eq!(query.eras, vec![Era::new(2001, 2020).unwrap()]);
    }

    #[test]
    fn test_lookup_limit_and_empty_query() {
        let catalog = JsonCatalog::from_json(SEARCH_RESPONSE).unwrap();
        assert_eq!(catalog.lookup("", 10).unwrap().len(), 3);
        assert_eq!(catalog.lookup("", 2).unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_json() {
        assert!(JsonCatalog::from_json("{not json").is_err());
        assert!(JsonCatalog::load("/definitely/not/here.json").is_err());
    }
}
