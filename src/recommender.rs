//! End-to-end recommendation pipeline
//!
//! ```text
//! candidates ──> year window ──┐
//!                              ├──> FeatureEncoder ──> SimilarityRanker ──> top N
//! references ──────────────────┘
//! ```
//!
//! Every call fits its own vocabularies and topic model; nothing outlives
//! the call.

use crate::config::RecommendConfig;
use bookrec_catalog::filter_by_year;
use bookrec_core::{Book, Result};
use bookrec_features::{DegenerateModelWarning, FeatureEncoder};
use bookrec_similarity::{RankedBook, RankingStats, RecommendationResponse, SimilarityRanker};
use tracing::info;

/// Result of one recommendation run
#[derive(Debug, Clone)]
pub struct Recommendations {
    pub results: Vec<RankedBook>,
    pub warnings: Vec<DegenerateModelWarning>,
    pub stats: RankingStats,
}

impl Recommendations {
    pub fn into_response(self) -> RecommendationResponse {
        let warnings = self.warnings.iter().map(ToString::to_string).collect();
        RecommendationResponse::from_ranked(self.results)
            .with_warnings(warnings)
            .with_stats(self.stats)
    }
}

#[derive(Debug, Clone)]
pub struct Recommender {
    config: RecommendConfig,
    encoder: FeatureEncoder,
}

impl Recommender {
    pub fn new(config: RecommendConfig) -> Result<Self> {
        config.validate()?;
        let encoder = FeatureEncoder::new(config.encoder_config());
        Ok(Self { config, encoder })
    }

    #[inline]
    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    /// Rank `candidates` against `references`.
    ///
    /// Candidates outside the configured year window are dropped first.
    /// Fails with `Error::DataInsufficient` when either list is empty
    /// after filtering.
    pub fn recommend(&self, references: &[Book], candidates: &[Book]) -> Result<Recommendations> {
        let candidates = filter_by_year(candidates.to_vec(), &self.config.year_window()?);

        let encoded = self.encoder.encode(references, &candidates)?;

        let mut ranker = SimilarityRanker::new(self.config.limit);
        if self.config.exclude_references {
            ranker = ranker.with_excluded_keys(references.iter().filter_map(Book::key));
        }
        let results = ranker.rank(&encoded.reference, &encoded.candidate, &candidates)?;

        let stats = RankingStats {
            references: references.len(),
            candidates: candidates.len(),
            returned: results.len(),
            top_score: results.first().map(|r| r.score),
        };
        info!(
            references = stats.references,
            candidates = stats.candidates,
            returned = stats.returned,
            "recommendations ready"
        );

        Ok(Recommendations {
            results,
            warnings: encoded.warnings,
            stats,
        })
    }
}

impl Default for Recommender {
    fn default() -> Self {
        Self {
            config: RecommendConfig::default(),
            encoder: FeatureEncoder::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> Vec<Book> {
        vec![
            Book::new("The Hobbit", "J.R.R. Tolkien")
                .with_id("OL1W")
                .with_year(1937)
                .with_genres(["fantasy"])
                .with_description(
                    "A wizard and a hobbit go on a quest to reclaim treasure from a dragon.",
                ),
            Book::new("The Fellowship of the Ring", "J.R.R. Tolkien")
                .with_id("OL2W")
                .with_year(1954)
                .with_genres(["fantasy"])
                .with_description(
                    "A hobbit carries a ring on a quest while a wizard guides the fellowship.",
                ),
            Book::new("Murder on the Orient Express", "Agatha Christie")
                .with_id("OL3W")
                .with_year(1934)
                .with_genres(["mystery"])
                .with_description("A detective investigates a murder aboard a snowbound train."),
        ]
    }

    #[test]
    fn test_year_window_applies_to_candidates() {
        let config = RecommendConfig {
            max_year: Some(1940),
            ..RecommendConfig::default()
        };
        let recommender = Recommender::new(config).unwrap();
        let books = library();
        let recs = recommender.recommend(&books[..1], &books).unwrap();
        assert_eq!(recs.stats.candidates, 2);
        assert!(recs.results.iter().all(|r| r.book.year.unwrap() <= 1940));
    }

    #[test]
    fn test_exclude_references() {
        let config = RecommendConfig {
            exclude_references: true,
            ..RecommendConfig::default()
        };
        let recommender = Recommender::new(config).unwrap();
        let books = library();
        let recs = recommender.recommend(&books[..1], &books).unwrap();
        assert_eq!(recs.results.len(), 2);
        assert!(recs.results.iter().all(|r| r.key() != Some("OL1W")));
        assert_eq!(recs.results[0].key(), Some("OL2W"));
    }

    #[test]
    fn test_window_emptying_candidates_is_insufficient() {
        let config = RecommendConfig {
            min_year: Some(2100),
            ..RecommendConfig::default()
        };
        let recommender = Recommender::new(config).unwrap();
        let books = library();
        let err = recommender.recommend(&books, &books).unwrap_err();
        assert!(err.is_data_insufficient());
    }

    #[test]
    fn test_response_carries_stats() {
        let books = library();
        let response = Recommender::default()
            .recommend(&books[..1], &books)
            .unwrap()
            .into_response();
        assert_eq!(response.result.len(), 3);
        assert_eq!(response.stats.unwrap().references, 1);
        // 4 documents for 5 topics
        assert!(!response.warnings.is_empty());
    }
}
