//! # bookrec Catalog
//!
//! The boundary between the recommendation pipeline and the book catalog.
//!
//! Catalog records arrive loosely shaped; they are validated exactly once
//! here, through [`RawRecord::into_book`], and every later stage works on
//! typed [`Book`](bookrec_core::Book) values.
//!
//! ## Example
//!
//! ```rust
//! use bookrec_catalog::{books_for, Catalog, JsonCatalog};
//!
//! let catalog = JsonCatalog::from_json(r#"[
//!     {"key": "/works/OL1W", "title": "Dune", "subject": ["Science Fiction"], "first_publish_year": 1965}
//! ]"#).unwrap();
//!
//! let books = books_for(&catalog, "dune", 10).unwrap();
//! assert_eq!(books[0].key(), Some("OL1W"));
//! assert!(books[0].genres.contains("science fiction"));
//! ```

pub mod era;
pub mod json;
pub mod record;

pub use era::{filter_by_year, subject_queries, Era, YearWindow, ERAS};
pub use json::JsonCatalog;
pub use record::{FirstSentence, RawRecord};

use ahash::AHashSet;
use bookrec_core::{Book, Result};
use tracing::debug;

/// A source of raw book records
pub trait Catalog {
    /// Up to `limit` records matching a free-text query
    fn lookup(&self, query: &str, limit: usize) -> Result<Vec<RawRecord>>;
}

/// Look up records and normalize them into books
pub fn books_for<C: Catalog + ?Sized>(catalog: &C, query: &str, limit: usize) -> Result<Vec<Book>> {
    Ok(catalog
        .lookup(query, limit)?
        .into_iter()
        .map(RawRecord::into_book)
        .collect())
}

/// Run every query, then merge the hits in query order.
///
/// A book whose key was already fetched by an earlier query is skipped;
/// books without a key are always kept.
pub fn books_for_queries<C, Q>(catalog: &C, queries: &[Q], limit: usize) -> Result<Vec<Book>>
where
    C: Catalog + ?Sized,
    Q: AsRef<str>,
{
    let mut seen: AHashSet<String> = AHashSet::new();
    let mut merged = Vec::new();
    for query in queries {
        let books = books_for(catalog, query.as_ref(), limit)?;
        debug!(query = query.as_ref(), hits = books.len(), "catalog lookup");
        for book in books {
            if let Some(key) = book.key() {
                if !seen.insert(key.to_string()) {
                    continue;
                }
            }
            merged.push(book);
        }
    }
    Ok(merged)
}
