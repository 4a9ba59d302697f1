//! # bookrec Similarity
//!
//! Cosine-similarity ranking of candidate books against reference books.
//!
//! ## Algorithm
//!
//! 1. Pairwise cosine similarity between every reference row and every
//!    candidate row (0 whenever a row is all zeros)
//! 2. Aggregate score per candidate: mean over the reference rows
//! 3. Stable sort by score, descending
//! 4. Deduplicate by identity key, keeping the best occurrence
//! 5. Truncate to the result limit
//!
//! ## Example
//!
//! ```rust
//! use bookrec_core::{Book, FeatureMatrix, Vector};
//! use bookrec_similarity::SimilarityRanker;
//!
//! let reference = FeatureMatrix::from_rows(2, vec![Vector::new(vec![1.0, 0.0])]).unwrap();
//! let candidates = FeatureMatrix::from_rows(2, vec![
//!     Vector::new(vec![0.0, 1.0]),
//!     Vector::new(vec![1.0, 0.1]),
//! ]).unwrap();
//! let books = vec![
//!     Book::new("Far", "A").with_id("far"),
//!     Book::new("Near", "B").with_id("near"),
//! ];
//!
//! let ranked = SimilarityRanker::new(1).rank(&reference, &candidates, &books).unwrap();
//! assert_eq!(ranked[0].book.title, "Near");
//! ```

pub mod explain;
pub mod ranker;

pub use explain::{ExplainedBook, RankingStats, RecommendationResponse};
pub use ranker::{RankedBook, SimilarityRanker, DEFAULT_LIMIT};
