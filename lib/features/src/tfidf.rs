//! TF-IDF vocabulary fitted on one corpus and applied to any other.
//!
//! tfidf(t, d) = tf(t, d) × idf(t), with the smoothed
//! idf(t) = ln((1 + n) / (1 + df(t))) + 1 and L2-normalized rows.
//! Terms the fitted corpus never saw are dropped at transform time.

use ahash::AHashMap;
use bookrec_core::{Error, Result, Vector};
use std::collections::BTreeMap;

/// Tokens shorter than this are ignored
const MIN_TOKEN_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct TfidfVocabulary {
    terms: Vec<String>,
    index: AHashMap<String, usize>,
    idf: Vec<f32>,
    n_docs: usize,
}

impl TfidfVocabulary {
    /// Learn vocabulary and document frequencies from normalized texts.
    ///
    /// Texts that normalize to nothing still count as documents. A corpus
    /// made only of such texts yields an empty vocabulary.
    pub fn fit<S: AsRef<str>>(documents: &[S]) -> Result<Self> {
        if documents.is_empty() {
            return Err(Error::DataInsufficient(
                "cannot fit TF-IDF vocabulary on an empty corpus".to_string(),
            ));
        }

        // BTreeMap keeps the vocabulary in lexicographic order
        let mut doc_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for doc in documents {
            let mut seen: Vec<&str> = tokens(doc.as_ref()).collect();
            seen.sort_unstable();
            seen.dedup();
            for term in seen {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        let n_docs = documents.len();
        let mut terms = Vec::with_capacity(doc_freq.len());
        let mut index = AHashMap::with_capacity(doc_freq.len());
        let mut idf = Vec::with_capacity(doc_freq.len());

        for (position, (term, df)) in doc_freq.into_iter().enumerate() {
            let value = ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0;
            terms.push(term.to_string());
            index.insert(term.to_string(), position);
            idf.push(value as f32);
        }

        Ok(Self {
            terms,
            index,
            idf,
            n_docs,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn n_docs(&self) -> usize {
        self.n_docs
    }

    /// Vocabulary terms in column order
    #[inline]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.term_index(term).map(|i| self.idf[i])
    }

    /// Transform one normalized text into an L2-normalized term-weight vector
    pub fn transform(&self, text: &str) -> Vector {
        let mut weights = vec![0.0f32; self.len()];
        for token in tokens(text) {
            if let Some(&i) = self.index.get(token) {
                weights[i] += 1.0;
            }
        }
        for (w, idf) in weights.iter_mut().zip(&self.idf) {
            *w *= idf;
        }

        let mut vector = Vector::new(weights);
        vector.normalize();
        vector
    }

    pub fn transform_all<S: AsRef<str>>(&self, documents: &[S]) -> Vec<Vector> {
        documents.iter().map(|d| self.transform(d.as_ref())).collect()
    }
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
}
