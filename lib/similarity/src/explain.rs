//! Output structures handed to the presentation layer
//!
//! The list is already ordered and deduplicated; consumers render it as is.

use crate::ranker::RankedBook;
use serde::Serialize;
use std::collections::BTreeSet;

/// One recommended book, flattened for serialization
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExplainedBook {
    /// 1-based position in the result list
    pub rank: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub genres: BTreeSet<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_id: Option<String>,
    /// Mean cosine similarity to the reference books
    pub score: f32,
}

impl ExplainedBook {
    pub fn from_ranked(rank: usize, ranked: RankedBook) -> Self {
        let book = ranked.book;
        Self {
            rank,
            id: book.id,
            title: book.title,
            author: book.author,
            year: book.year,
            genres: book.genres,
            cover_id: book.cover_id,
            score: ranked.score,
        }
    }

    pub fn from_ranked_list(ranked_list: Vec<RankedBook>) -> Vec<Self> {
        ranked_list
            .into_iter()
            .enumerate()
            .map(|(i, r)| Self::from_ranked(i + 1, r))
            .collect()
    }
}

/// Summary numbers for one ranking run
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct RankingStats {
    pub references: usize,
    pub candidates: usize,
    pub returned: usize,
    pub top_score: Option<f32>,
}

/// Response structure for a recommendation request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RecommendationResponse {
    pub result: Vec<ExplainedBook>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<RankingStats>,
}

impl RecommendationResponse {
    pub fn new(result: Vec<ExplainedBook>) -> Self {
        Self {
            result,
            warnings: Vec::new(),
            stats: None,
        }
    }

    /// Empty response, the "no results" state
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn from_ranked(ranked_list: Vec<RankedBook>) -> Self {
        Self::new(ExplainedBook::from_ranked_list(ranked_list))
    }

    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    #[must_use]
    pub fn with_stats(mut self, stats: RankingStats) -> Self {
        self.stats = Some(stats);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookrec_core::Book;
    use serde_json::json;

    fn ranked(id: &str, score: f32, index: usize) -> RankedBook {
        RankedBook {
            book: Book::new(format!("Title {}", id), "Author")
                .with_id(id)
                .with_genres(["fantasy"]),
            score,
            candidate_index: index,
        }
    }

    #[test]
    fn test_ranks_are_one_based() {
        let list = ExplainedBook::from_ranked_list(vec![ranked("a", 0.9, 2), ranked("b", 0.5, 0)]);
        assert_eq!(list[0].rank, 1);
        assert_eq!(list[1].rank, 2);
        assert_eq!(list[1].id.as_deref(), Some("b"));
    }

    #[test]
    fn test_response_serialization() {
        let response = RecommendationResponse::from_ranked(vec![ranked("a", 0.5, 0)]);
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "result": [{
                    "rank": 1,
                    "id": "a",
                    "title": "Title a",
                    "author": "Author",
                    "genres": ["fantasy"],
                    "score": 0.5
                }]
            })
        );
    }

    #[test]
    fn test_empty_response() {
        let value = serde_json::to_value(RecommendationResponse::empty()).unwrap();
        assert_eq!(value, json!({ "result": [] }));
    }
}
