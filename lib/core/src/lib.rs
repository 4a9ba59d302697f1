//! # bookrec Core
//!
//! Core library for the bookrec recommendation pipeline.
//!
//! This crate provides the fundamental data structures shared by every stage:
//!
//! - [`Book`] - A typed catalog record with explicit optional fields
//! - [`Vector`] - Dense feature vector with cosine similarity
//! - [`FeatureMatrix`] - Fixed-width rows aligned to a book list
//! - [`TextNormalizer`] - Lowercasing, punctuation stripping and stopword removal
//!
//! ## Example
//!
//! ```rust
//! use bookrec_core::{normalize, Vector};
//!
//! assert_eq!(normalize("A wizard goes on a quest"), "wizard goes quest");
//!
//! let a = Vector::new(vec![1.0, 0.0]);
//! let zero = Vector::zeros(2);
//! assert_eq!(a.cosine_similarity(&zero), 0.0);
//! ```

pub mod book;
pub mod error;
pub mod matrix;
pub mod text;
pub mod vector;

pub use book::{Book, UNKNOWN_AUTHOR, UNKNOWN_TITLE};
pub use error::{Error, Result};
pub use matrix::FeatureMatrix;
pub use text::{normalize, TextNormalizer, ENGLISH_STOPWORDS};
pub use vector::Vector;
