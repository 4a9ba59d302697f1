//! # bookrec Features
//!
//! Feature extraction for book records.
//!
//! Turns heterogeneous book metadata into one comparable vector per book:
//!
//! - **TF-IDF**: term weights over normalized descriptions
//! - **Genres**: multi-hot encoding over the candidate genre vocabulary
//! - **Topics**: dominant LDA topic, one-hot (or scalar) encoded
//!
//! ## Example
//!
//! ```rust
//! use bookrec_core::Book;
//! use bookrec_features::FeatureEncoder;
//!
//! let candidates = vec![
//!     Book::new("The Hobbit", "J. R. R. Tolkien")
//!         .with_id("OL27482W")
//!         .with_description("a wizard goes on a quest")
//!         .with_genres(["fantasy"]),
//!     Book::new("The Hound of the Baskervilles", "Arthur Conan Doyle")
//!         .with_id("OL262463W")
//!         .with_description("a detective solves a murder")
//!         .with_genres(["mystery"]),
//! ];
//! let references = vec![candidates[0].clone()];
//!
//! let encoded = FeatureEncoder::default().encode(&references, &candidates).unwrap();
//! assert_eq!(encoded.reference.n_cols(), encoded.candidate.n_cols());
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌─────────────┐
//! │  Candidates │────>│ FittedVocabulary │────>│  Candidate  │
//! │  (fit)      │     │ tfidf/genre/LDA  │     │  matrix     │
//! └─────────────┘     └──────────────────┘     └─────────────┘
//!                              │
//! ┌─────────────┐              │               ┌─────────────┐
//! │  References │──────────────┴──────────────>│  Reference  │
//! │  (apply)    │                              │  matrix     │
//! └─────────────┘                              └─────────────┘
//! ```

pub mod encoder;
pub mod genre;
pub mod tfidf;
pub mod topic;

pub use encoder::{
    Corpus, EncodedFeatures, EncoderBuilder, EncoderConfig, FeatureEncoder, FeatureWeights,
    FittedVocabulary, TopicEncoding,
};
pub use genre::GenreVocabulary;
pub use tfidf::TfidfVocabulary;
pub use topic::{
    DegenerateModelWarning, TopicConfig, TopicLabeler, TopicLabels, TopicModel, DEFAULT_PASSES,
    DEFAULT_SEED, DEFAULT_TOPICS, FALLBACK_TOPIC,
};
