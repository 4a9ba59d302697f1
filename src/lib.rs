//! # bookrec
//!
//! Content-based book recommendations.
//!
//! bookrec scores a candidate set of books against a reference set (the
//! books a reader already likes) using a composite content-similarity
//! metric, and returns a deduplicated top-N list.
//!
//! ## Pipeline
//!
//! 1. **Normalize** descriptions: lowercase, strip punctuation, drop stopwords
//! 2. **Encode** each book as `[TF-IDF | genre multi-hot | topic one-hot]`,
//!    with vocabularies fitted on the candidate set and one LDA model
//!    fitted over both sets
//! 3. **Rank** candidates by mean cosine similarity to the references,
//!    deduplicate by catalog key, keep the top N
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! bookrec --candidates books.json --reference-ids OL27482W --limit 10
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use bookrec::prelude::*;
//!
//! let candidates = vec![
//!     Book::new("A", "X").with_id("1").with_description("a wizard goes on a quest").with_genres(["fantasy"]),
//!     Book::new("B", "Y").with_id("2").with_description("a wizard goes on a quest").with_genres(["fantasy"]),
//!     Book::new("C", "Z").with_id("3").with_description("a detective solves a murder").with_genres(["mystery"]),
//! ];
//!
//! let recommender = Recommender::new(RecommendConfig { limit: 2, ..Default::default() }).unwrap();
//! let recs = recommender.recommend(&candidates[..1], &candidates).unwrap();
//! assert_eq!(recs.results.len(), 2);
//! assert!(recs.results.iter().all(|r| r.book.genres.contains("fantasy")));
//! ```
//!
//! ## Crate Structure
//!
//! - `bookrec-core` - Book, Vector, FeatureMatrix, text normalization, errors
//! - `bookrec-features` - TF-IDF, genre and LDA topic features
//! - `bookrec-similarity` - Cosine ranking and result types
//! - `bookrec-catalog` - Catalog records, JSON catalogs, era filters

pub mod config;
pub mod recommender;

pub use config::RecommendConfig;
pub use recommender::{Recommendations, Recommender};

// Re-export core types
pub use bookrec_core::{normalize, Book, Error, FeatureMatrix, Result, TextNormalizer, Vector};

// Re-export features
pub use bookrec_features::{
    DegenerateModelWarning, EncodedFeatures, EncoderBuilder, EncoderConfig, FeatureEncoder,
    FeatureWeights, FittedVocabulary, TopicEncoding, TopicLabeler, TopicModel,
};

// Re-export similarity
pub use bookrec_similarity::{RankedBook, RecommendationResponse, SimilarityRanker};

// Re-export catalog
pub use bookrec_catalog::{
    books_for, books_for_queries, subject_queries, Catalog, Era, JsonCatalog, RawRecord, YearWindow,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Book, Catalog, Error, FeatureEncoder, JsonCatalog, RankedBook, RecommendConfig,
        Recommendations, Recommender, Result, SimilarityRanker,
    };
}
