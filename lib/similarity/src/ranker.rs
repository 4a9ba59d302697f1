//! Ranker for candidate books
//!
//! Scores every candidate by its mean cosine similarity to the reference
//! rows, then sorts, deduplicates by identity key and truncates.

use ahash::AHashSet;
use bookrec_core::{Book, Error, FeatureMatrix, Result, Vector};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::cmp::Reverse;
use tracing::debug;

/// Default number of results
pub const DEFAULT_LIMIT: usize = 20;

/// A candidate book with its aggregate score
#[derive(Debug, Clone, PartialEq)]
pub struct RankedBook {
    pub book: Book,
    /// Mean cosine similarity to the reference rows
    pub score: f32,
    /// Row of the book in the candidate list
    pub candidate_index: usize,
}

impl RankedBook {
    #[inline]
    pub fn key(&self) -> Option<&str> {
        self.book.key()
    }
}

/// Ranks candidate rows against reference rows
#[derive(Debug, Clone)]
pub struct SimilarityRanker {
    limit: usize,
    excluded: AHashSet<String>,
}

impl Default for SimilarityRanker {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT)
    }
}

impl SimilarityRanker {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            excluded: AHashSet::new(),
        }
    }

    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Never return candidates carrying one of these identity keys
    pub fn with_excluded_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Pairwise cosine similarity, `S[i][j]` for reference row `i` and
    /// candidate row `j`. Entries involving a zero row are exactly 0.
    pub fn similarity_matrix(
        &self,
        reference: &FeatureMatrix,
        candidates: &FeatureMatrix,
    ) -> Result<Vec<Vec<f32>>> {
        check_inputs(reference, candidates)?;

        let candidate_norms: Vec<f32> = candidates.rows().iter().map(Vector::norm).collect();

        Ok(reference
            .rows()
            .par_iter()
            .map(|r| {
                let r_norm = r.norm();
                candidates
                    .rows()
                    .iter()
                    .zip(&candidate_norms)
                    .map(|(c, &c_norm)| cosine(r, r_norm, c, c_norm))
                    .collect()
            })
            .collect())
    }

    /// Mean of each similarity-matrix column
    pub fn aggregate_scores(
        &self,
        reference: &FeatureMatrix,
        candidates: &FeatureMatrix,
    ) -> Result<Vec<f32>> {
        let similarities = self.similarity_matrix(reference, candidates)?;
        let mut scores = vec![0.0f32; candidates.n_rows()];
        for row in &similarities {
            for (score, s) in scores.iter_mut().zip(row) {
                *score += s;
            }
        }
        let n = similarities.len() as f32;
        for score in &mut scores {
            *score /= n;
        }
        Ok(scores)
    }

    /// Rank `books` (row-aligned with `candidates`) against `reference`.
    ///
    /// Returns at most `limit` books, best first, with no identity key
    /// twice. Books without a key are never merged.
    pub fn rank(
        &self,
        reference: &FeatureMatrix,
        candidates: &FeatureMatrix,
        books: &[Book],
    ) -> Result<Vec<RankedBook>> {
        if books.len() != candidates.n_rows() {
            return Err(Error::InvalidDimension {
                expected: candidates.n_rows(),
                actual: books.len(),
            });
        }

        let scores = self.aggregate_scores(reference, candidates)?;

        let mut order: Vec<usize> = (0..books.len()).collect();
        // Stable: equal scores keep candidate order
        order.sort_by_key(|&j| Reverse(OrderedFloat(scores[j])));

        let mut seen: AHashSet<&str> = AHashSet::new();
        let mut results = Vec::with_capacity(self.limit.min(books.len()));
        for j in order {
            if results.len() >= self.limit {
                break;
            }
            let book = &books[j];
            if let Some(key) = book.key() {
                if self.excluded.contains(key) || !seen.insert(key) {
                    continue;
                }
            }
            results.push(RankedBook {
                book: book.clone(),
                score: scores[j],
                candidate_index: j,
            });
        }

        debug!(
            references = reference.n_rows(),
            candidates = candidates.n_rows(),
            returned = results.len(),
            "ranked candidates"
        );

        Ok(results)
    }
}

/// Cosine from precomputed norms; 0 when either row is all zero
#[inline]
fn cosine(a: &Vector, a_norm: f32, b: &Vector, b_norm: f32) -> f32 {
    if a_norm == 0.0 || b_norm == 0.0 {
        return 0.0;
    }
    (a.dot(b) / (a_norm * b_norm)).clamp(-1.0, 1.0)
}

fn check_inputs(reference: &FeatureMatrix, candidates: &FeatureMatrix) -> Result<()> {
    if reference.is_empty() {
        return Err(Error::DataInsufficient("reference features have no rows".to_string()));
    }
    if candidates.is_empty() {
        return Err(Error::DataInsufficient("candidate features have no rows".to_string()));
    }
    if reference.n_cols() != candidates.n_cols() {
        return Err(Error::InvalidDimension {
            expected: candidates.n_cols(),
            actual: reference.n_cols(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(rows: &[&[f32]]) -> FeatureMatrix {
        let n_cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let rows = rows.iter().map(|r| Vector::new(r.to_vec())).collect();
        FeatureMatrix::from_rows(n_cols, rows).unwrap()
    }

    fn books(ids: &[Option<&str>]) -> Vec<Book> {
        ids.iter()
            .enumerate()
            .map(|(i, id)| {
                let book = Book::new(format!("Book {}", i), "Author");
                match id {
                    Some(id) => book.with_id(*id),
                    None => book,
                }
            })
            .collect()
    }

    #[test]
    fn test_similarity_bounds_and_zero_rows() {
        let reference = matrix(&[&[1.0, 0.0], &[0.0, 0.0]]);
        let candidates = matrix(&[&[1.0, 1.0], &[-3.0, 0.0], &[0.0, 0.0]]);
        let s = SimilarityRanker::default().similarity_matrix(&reference, &candidates).unwrap();

        assert_eq!(s.len(), 2);
        assert!(s.iter().flatten().all(|v| (-1.0..=1.0).contains(v)));
        assert!((s[0][1] + 1.0).abs() < 1e-6);
        assert_eq!(s[0][2], 0.0);
        assert!(s[1].iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_small_norm_rows_are_scale_free() {
        let reference = matrix(&[&[1e-8, 0.0]]);
        let candidates = matrix(&[&[1.0, 0.0], &[0.0, 1e-20], &[1e-30, 1e-30]]);
        let s = SimilarityRanker::default()
            .similarity_matrix(&reference, &candidates)
            .unwrap();

        assert!((s[0][0] - 1.0).abs() < 1e-6);
        assert_eq!(s[0][1], 0.0);
        let expected = reference
            .row(0)
            .unwrap()
            .cosine_similarity(candidates.row(2).unwrap());
        assert!((s[0][2] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_aggregate_is_mean() {
        let reference = matrix(&[&[1.0, 0.0], &[0.0, 1.0]]);
        let candidates = matrix(&[&[1.0, 0.0], &[1.0, 1.0]]);
        let scores = SimilarityRanker::default().aggregate_scores(&reference, &candidates).unwrap();
        assert!((scores[0] - 0.5).abs() < 1e-6);
        assert!((scores[1] - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-6);
    }

    #[test]
    fn test_rank_orders_descending() {
        let reference = matrix(&[&[1.0, 0.0]]);
        let candidates = matrix(&[&[0.0, 1.0], &[1.0, 0.0], &[1.0, 1.0]]);
        let books = books(&[Some("a"), Some("b"), Some("c")]);
        let ranked = SimilarityRanker::new(10).rank(&reference, &candidates, &books).unwrap();

        let keys: Vec<_> = ranked.iter().map(|r| r.key().unwrap()).collect();
        assert_eq!(keys, vec!["b", "c", "a"]);
        assert_eq!(ranked[0].candidate_index, 1);
    }

    #[test]
    fn test_ties_keep_candidate_order() {
        let reference = matrix(&[&[1.0, 0.0]]);
        let candidates = matrix(&[&[0.0, 1.0], &[0.0, 2.0], &[0.0, 3.0]]);
        let books = books(&[Some("x"), Some("y"), Some("z")]);
        let ranked = SimilarityRanker::new(10).rank(&reference, &candidates, &books).unwrap();
        let indices: Vec<_> = ranked.iter().map(|r| r.candidate_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_dedup_keeps_best_and_never_merges_missing_keys() {
        let reference = matrix(&[&[1.0, 0.0]]);
        let candidates = matrix(&[&[0.5, 1.0], &[1.0, 0.0], &[1.0, 0.0], &[1.0, 0.0]]);
        let books = books(&[Some("dup"), Some("dup"), None, None]);
        let ranked = SimilarityRanker::new(10).rank(&reference, &candidates, &books).unwrap();

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].candidate_index, 1);
        assert_eq!(ranked.iter().filter(|r| r.key() == Some("dup")).count(), 1);
        assert_eq!(ranked.iter().filter(|r| r.key().is_none()).count(), 2);
    }

    #[test]
    fn test_truncation() {
        let reference = matrix(&[&[1.0, 0.0]]);
        let candidates = matrix(&[&[1.0, 0.0], &[0.5, 0.5], &[0.0, 1.0]]);
        let books = books(&[Some("a"), Some("b"), Some("c")]);

        let ranked = SimilarityRanker::new(2).rank(&reference, &candidates, &books).unwrap();
        assert_eq!(ranked.len(), 2);

        let ranked = SimilarityRanker::new(50).rank(&reference, &candidates, &books).unwrap();
        assert_eq!(ranked.len(), 3);
    }

    #[test]
    fn test_excluded_keys() {
        let reference = matrix(&[&[1.0, 0.0]]);
        let candidates = matrix(&[&[1.0, 0.0], &[0.5, 0.5]]);
        let books = books(&[Some("seed"), Some("other")]);
        let ranked = SimilarityRanker::new(10)
            .with_excluded_keys(["seed"])
            .rank(&reference, &candidates, &books)
            .unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].key(), Some("other"));
    }

    #[test]
    fn test_ranking_is_repeatable() {
        let reference = matrix(&[&[1.0, 0.2, 0.0], &[0.0, 1.0, 0.3]]);
        let candidates = matrix(&[
            &[0.3, 0.3, 0.3],
            &[1.0, 0.0, 0.0],
            &[0.0, 0.0, 1.0],
            &[0.3, 0.3, 0.3],
        ]);
        let books = books(&[Some("a"), Some("b"), None, Some("d")]);
        let ranker = SimilarityRanker::new(3);
        let first = ranker.rank(&reference, &candidates, &books).unwrap();
        let second = ranker.rank(&reference, &candidates, &books).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_inputs_are_insufficient() {
        let reference = matrix(&[&[1.0, 0.0]]);
        let empty = FeatureMatrix::new(2);
        let ranker = SimilarityRanker::default();
        assert!(ranker.rank(&reference, &empty, &[]).unwrap_err().is_data_insufficient());
        assert!(ranker
            .rank(&empty, &reference, &books(&[Some("a")]))
            .unwrap_err()
            .is_data_insufficient());
    }

    #[test]
    fn test_misaligned_inputs() {
        let reference = matrix(&[&[1.0, 0.0]]);
        let candidates = matrix(&[&[1.0, 0.0, 0.0]]);
        let ranker = SimilarityRanker::default();
        assert!(matches!(
            ranker.rank(&reference, &candidates, &books(&[Some("a")])),
            Err(Error::InvalidDimension { .. })
        ));
        let candidates = matrix(&[&[1.0, 0.0]]);
        assert!(matches!(
            ranker.rank(&reference, &candidates, &books(&[Some("a"), Some("b")])),
            Err(Error::InvalidDimension { .. })
        ));
    }
}
