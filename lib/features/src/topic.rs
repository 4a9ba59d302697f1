//! Topic modeling with Latent Dirichlet Allocation (LDA).
//!
//! The model is fit with collapsed Gibbs sampling driven by a seeded RNG,
//! so identical input and seed always produce identical topic ids. Topic
//! assignment for a document runs a deterministic fixed-point inference of
//! its topic mixture against the fitted topic-word distribution and picks
//! the most probable topic, lowest id first on ties.
//!
//! Documents that normalize to nothing cannot take part in fitting. They
//! still receive a topic id: the fallback topic 0.

use ahash::AHashMap;
use bookrec_core::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Default number of topics
pub const DEFAULT_TOPICS: usize = 5;

/// Default number of Gibbs sweeps over the corpus
pub const DEFAULT_PASSES: usize = 50;

/// Default random seed
pub const DEFAULT_SEED: u64 = 42;

/// Topic id given to documents excluded from fitting
pub const FALLBACK_TOPIC: usize = 0;

/// Topic-word smoothing prior
const ETA: f64 = 0.01;

/// Fixed-point iterations when inferring a document's topic mixture
const INFERENCE_ITERATIONS: usize = 50;
const INFERENCE_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopicConfig {
    /// Number of topics K
    #[serde(default = "default_topics")]
    pub topics: usize,
    /// Gibbs sweeps over the corpus
    #[serde(default = "default_passes")]
    pub passes: usize,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_topics() -> usize {
    DEFAULT_TOPICS
}

fn default_passes() -> usize {
    DEFAULT_PASSES
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl Default for TopicConfig {
    fn default() -> Self {
        Self {
            topics: DEFAULT_TOPICS,
            passes: DEFAULT_PASSES,
            seed: DEFAULT_SEED,
        }
    }
}

impl TopicConfig {
    pub fn new(topics: usize) -> Self {
        Self {
            topics,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.topics == 0 {
            return Err(Error::InvalidConfig(
                "topic count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Symmetric document-topic prior, 1/K
    #[inline]
    fn alpha(&self) -> f64 {
        1.0 / self.topics as f64
    }
}

/// The fitted model is usable but can only separate documents poorly.
///
/// Informational only: it never interrupts the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DegenerateModelWarning {
    #[error("only {documents} non-empty documents for {topics} topics")]
    TooFewDocuments { documents: usize, topics: usize },

    #[error("topic vocabulary collapsed to {terms} term(s)")]
    CollapsedVocabulary { terms: usize },

    #[error("no non-empty documents; every document falls back to topic 0")]
    NoUsableDocuments,
}

/// A fitted LDA model.
///
/// Immutable once fit. One model is shared by reference across every
/// corpus encoded in the same invocation.
#[derive(Debug, Clone)]
pub struct TopicModel {
    config: TopicConfig,
    dictionary: AHashMap<String, usize>,
    terms: Vec<String>,
    /// Topic-word distribution (K × V), rows sum to 1
    topic_word: Vec<Vec<f64>>,
    fitted_documents: usize,
    warnings: Vec<DegenerateModelWarning>,
}

impl TopicModel {
    /// Fit a model over normalized texts. Empty texts are skipped.
    pub fn fit<S: AsRef<str>>(texts: &[S], config: TopicConfig) -> Result<Self> {
        config.validate()?;

        let mut dictionary: AHashMap<String, usize> = AHashMap::new();
        let mut terms: Vec<String> = Vec::new();
        let mut corpus: Vec<Vec<usize>> = Vec::new();

        for text in texts {
            let mut bag = Vec::new();
            for token in text.as_ref().split_whitespace() {
                let id = match dictionary.get(token) {
                    Some(&id) => id,
                    None => {
                        let id = terms.len();
                        dictionary.insert(token.to_string(), id);
                        terms.push(token.to_string());
                        id
                    }
                };
                bag.push(id);
            }
            if !bag.is_empty() {
                corpus.push(bag);
            }
        }

        let k = config.topics;
        let mut warnings = Vec::new();
        if corpus.is_empty() {
            warnings.push(DegenerateModelWarning::NoUsableDocuments);
        } else {
            if corpus.len() < k {
                warnings.push(DegenerateModelWarning::TooFewDocuments {
                    documents: corpus.len(),
                    topics: k,
                });
            }
            if terms.len() <= 1 {
                warnings.push(DegenerateModelWarning::CollapsedVocabulary { terms: terms.len() });
            }
        }
        for warning in &warnings {
            warn!(%warning, "degenerate topic model");
        }

        let topic_word = gibbs_sample(&corpus, terms.len(), &config);

        debug!(
            documents = corpus.len(),
            skipped = texts.len() - corpus.len(),
            terms = terms.len(),
            topics = k,
            "fitted topic model"
        );

        Ok(Self {
            config,
            dictionary,
            terms,
            topic_word,
            fitted_documents: corpus.len(),
            warnings,
        })
    }

    #[inline]
    pub fn n_topics(&self) -> usize {
        self.config.topics
    }

    #[inline]
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn fitted_documents(&self) -> usize {
        self.fitted_documents
    }

    #[inline]
    pub fn config(&self) -> &TopicConfig {
        &self.config
    }

    #[inline]
    pub fn warnings(&self) -> &[DegenerateModelWarning] {
        &self.warnings
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Infer the topic mixture of a normalized text.
    ///
    /// Returns `None` when the text has no term the model knows.
    pub fn infer(&self, text: &str) -> Option<Vec<f64>> {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in text.split_whitespace() {
            if let Some(&id) = self.dictionary.get(token) {
                *counts.entry(id).or_insert(0.0) += 1.0;
            }
        }
        if counts.is_empty() {
            return None;
        }

        let k = self.n_topics();
        let alpha = self.config.alpha();
        let mut theta = vec![1.0 / k as f64; k];
        let mut responsibilities = vec![0.0f64; k];

        for _ in 0..INFERENCE_ITERATIONS {
            let mut next = vec![alpha; k];
            for (&w, &count) in &counts {
                let mut total = 0.0;
                for t in 0..k {
                    responsibilities[t] = theta[t] * self.topic_word[t][w];
                    total += responsibilities[t];
                }
                if total > 0.0 {
                    for t in 0..k {
                        next[t] += count * responsibilities[t] / total;
                    }
                }
            }
            let sum: f64 = next.iter().sum();
            for value in &mut next {
                *value /= sum;
            }

            let delta: f64 = next.iter().zip(&theta).map(|(a, b)| (a - b).abs()).sum();
            theta = next;
            if delta < INFERENCE_TOLERANCE {
                break;
            }
        }

        Some(theta)
    }

    /// Most probable topic of a normalized text, ties to the lowest id
    pub fn assign(&self, text: &str) -> usize {
        match self.infer(text) {
            Some(theta) => argmax(&theta),
            None => FALLBACK_TOPIC,
        }
    }

    pub fn assign_all<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Vec<usize> {
        texts.par_iter().map(|t| self.assign(t.as_ref())).collect()
    }

    /// Highest-probability terms for each topic
    pub fn top_terms(&self, n_terms: usize) -> Vec<Vec<(String, f64)>> {
        self.topic_word
            .iter()
            .map(|row| {
                let mut scored: Vec<(String, f64)> = self
                    .terms
                    .iter()
                    .cloned()
                    .zip(row.iter().copied())
                    .collect();
                scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
                scored.truncate(n_terms);
                scored
            })
            .collect()
    }
}

/// Collapsed Gibbs sampling; returns the smoothed topic-word distribution
fn gibbs_sample(corpus: &[Vec<usize>], n_terms: usize, config: &TopicConfig) -> Vec<Vec<f64>> {
    let k = config.topics;
    let alpha = config.alpha();
    let eta_sum = ETA * n_terms as f64;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut doc_topic = vec![vec![0usize; k]; corpus.len()];
    let mut topic_word = vec![vec![0usize; n_terms]; k];
    let mut topic_total = vec![0usize; k];

    let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(corpus.len());
    for (d, doc) in corpus.iter().enumerate() {
        let mut doc_assignments = Vec::with_capacity(doc.len());
        for &w in doc {
            let t = rng.random_range(0..k);
            doc_topic[d][t] += 1;
            topic_word[t][w] += 1;
            topic_total[t] += 1;
            doc_assignments.push(t);
        }
        assignments.push(doc_assignments);
    }

    let mut weights = vec![0.0f64; k];
    for _ in 0..config.passes {
        for (d, doc) in corpus.iter().enumerate() {
            for (i, &w) in doc.iter().enumerate() {
                let old = assignments[d][i];
                doc_topic[d][old] -= 1;
                topic_word[old][w] -= 1;
                topic_total[old] -= 1;

                let mut total = 0.0;
                for t in 0..k {
                    let p = (doc_topic[d][t] as f64 + alpha)
                        * (topic_word[t][w] as f64 + ETA)
                        / (topic_total[t] as f64 + eta_sum);
                    total += p;
                    weights[t] = total;
                }

                let u = rng.random::<f64>() * total;
                let new = weights.iter().position(|&c| u < c).unwrap_or(k - 1);

                assignments[d][i] = new;
                doc_topic[d][new] += 1;
                topic_word[new][w] += 1;
                topic_total[new] += 1;
            }
        }
    }

    topic_word
        .iter()
        .zip(&topic_total)
        .map(|(row, &total)| {
            row.iter()
                .map(|&count| (count as f64 + ETA) / (total as f64 + eta_sum))
                .collect()
        })
        .collect()
}

fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}

/// Labels one batch of texts: fits a fresh model and assigns every text
/// its dominant topic.
#[derive(Debug, Clone, Default)]
pub struct TopicLabeler {
    config: TopicConfig,
}

/// Topic ids aligned with the labeled texts
#[derive(Debug, Clone, PartialEq)]
pub struct TopicLabels {
    pub topics: Vec<usize>,
    pub warnings: Vec<DegenerateModelWarning>,
}

impl TopicLabeler {
    pub fn new(config: TopicConfig) -> Self {
        Self { config }
    }

    pub fn with_topics(topics: usize) -> Self {
        Self::new(TopicConfig::new(topics))
    }

    pub fn label<S: AsRef<str> + Sync>(&self, texts: &[S]) -> Result<TopicLabels> {
        let model = TopicModel::fit(texts, self.config)?;
        Ok(TopicLabels {
            topics: model.assign_all(texts),
            warnings: model.warnings,
        })
    }
}
