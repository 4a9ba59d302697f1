//! Feature Encoder
//!
//! Converts books into fixed-width composite vectors. Each row is the
//! concatenation of three blocks, each scaled by the square root of its
//! weight:
//!
//! ```text
//! [ TF-IDF over descriptions | genre multi-hot | topic block ]
//! ```
//!
//! Vocabularies are fitted on the candidate corpus and applied to both
//! corpora, so reference and candidate rows share one coordinate space.
//! The topic model is fitted once over both corpora together.

use crate::genre::GenreVocabulary;
use crate::tfidf::TfidfVocabulary;
use crate::topic::{DegenerateModelWarning, TopicConfig, TopicModel};
use bookrec_core::{Book, Error, FeatureMatrix, Result, TextNormalizer, Vector};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How the topic id enters the feature row
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TopicEncoding {
    /// K columns, 1.0 at the assigned topic
    #[default]
    OneHot,
    /// A single column holding the raw topic id
    Scalar,
}

impl TopicEncoding {
    #[inline]
    pub fn width(&self, topics: usize) -> usize {
        match self {
            TopicEncoding::OneHot => topics,
            TopicEncoding::Scalar => 1,
        }
    }

    fn encode(&self, topic: usize, topics: usize) -> Vec<f32> {
        match self {
            TopicEncoding::OneHot => {
                let mut block = vec![0.0; topics];
                if let Some(slot) = block.get_mut(topic) {
                    *slot = 1.0;
                }
                block
            }
            TopicEncoding::Scalar => vec![topic as f32],
        }
    }
}

/// Relative weight of each feature block
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FeatureWeights {
    #[serde(default = "default_weight")]
    pub text: f32,
    #[serde(default = "default_weight")]
    pub genre: f32,
    #[serde(default = "default_weight")]
    pub topic: f32,
}

fn default_weight() -> f32 {
    1.0
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            text: 1.0,
            genre: 1.0,
            topic: 1.0,
        }
    }
}

impl FeatureWeights {
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in [("text", self.text), ("genre", self.genre), ("topic", self.topic)] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "weight '{}' must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct EncoderConfig {
    #[serde(flatten)]
    pub topic: TopicConfig,
    #[serde(default)]
    pub topic_encoding: TopicEncoding,
    #[serde(default)]
    pub weights: FeatureWeights,
}

impl EncoderConfig {
    pub fn validate(&self) -> Result<()> {
        self.topic.validate()?;
        self.weights.validate()
    }
}

/// A book list together with its normalized descriptions
#[derive(Debug, Clone)]
pub struct Corpus<'a> {
    books: &'a [Book],
    texts: Vec<String>,
}

impl<'a> Corpus<'a> {
    pub fn new(books: &'a [Book], normalizer: &TextNormalizer) -> Self {
        let texts = books
            .iter()
            .map(|book| normalizer.normalize(&book.description))
            .collect();
        Self { books, texts }
    }

    #[inline]
    pub fn books(&self) -> &'a [Book] {
        self.books
    }

    /// Normalized descriptions, aligned with `books()`
    #[inline]
    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

/// Vocabularies and topic model fitted for one invocation.
///
/// Built once, then passed by reference to every `encode` call. Vectors
/// produced by different `FittedVocabulary` values are not comparable.
#[derive(Debug, Clone)]
pub struct FittedVocabulary {
    tfidf: TfidfVocabulary,
    genres: GenreVocabulary,
    topics: TopicModel,
    topic_encoding: TopicEncoding,
    weights: FeatureWeights,
}

impl FittedVocabulary {
    /// Fit TF-IDF and genre vocabularies on `candidates`, and the topic
    /// model on the union of both corpora.
    pub fn fit(
        candidates: &Corpus<'_>,
        references: &Corpus<'_>,
        config: &EncoderConfig,
    ) -> Result<Self> {
        config.validate()?;
        if candidates.is_empty() {
            return Err(Error::DataInsufficient("candidate corpus is empty".to_string()));
        }
        if references.is_empty() {
            return Err(Error::DataInsufficient("reference corpus is empty".to_string()));
        }

        let tfidf = TfidfVocabulary::fit(candidates.texts())?;
        let genres = GenreVocabulary::fit(candidates.books().iter().map(|b| &b.genres));

        let union: Vec<&str> = candidates
            .texts()
            .iter()
            .chain(references.texts())
            .map(String::as_str)
            .collect();
        let topics = TopicModel::fit(&union, config.topic)?;

        debug!(
            terms = tfidf.len(),
            genres = genres.len(),
            topics = topics.n_topics(),
            "fitted vocabulary"
        );

        Ok(Self {
            tfidf,
            genres,
            topics,
            topic_encoding: config.topic_encoding,
            weights: config.weights,
        })
    }

    #[inline]
    pub fn tfidf(&self) -> &TfidfVocabulary {
        &self.tfidf
    }

    #[inline]
    pub fn genres(&self) -> &GenreVocabulary {
        &self.genres
    }

    #[inline]
    pub fn topic_model(&self) -> &TopicModel {
        &self.topics
    }

    /// Total row width
    pub fn width(&self) -> usize {
        self.tfidf.len() + self.genres.len() + self.topic_encoding.width(self.topics.n_topics())
    }

    /// Topic ids for a corpus, aligned with its books
    pub fn topic_ids(&self, corpus: &Corpus<'_>) -> Vec<usize> {
        self.topics.assign_all(corpus.texts())
    }

    /// Encode a corpus into one row per book
    pub fn encode(&self, corpus: &Corpus<'_>) -> Result<FeatureMatrix> {
        let topic_ids = self.topic_ids(corpus);
        self.encode_with_topics(corpus, &topic_ids)
    }

    fn encode_with_topics(
        &self,
        corpus: &Corpus<'_>,
        topic_ids: &[usize],
    ) -> Result<FeatureMatrix> {
        let width = self.width();
        let text_scale = self.weights.text.sqrt();
        let genre_scale = self.weights.genre.sqrt();
        let topic_scale = self.weights.topic.sqrt();
        let n_topics = self.topics.n_topics();

        let mut matrix = FeatureMatrix::with_capacity(width, corpus.len());
        for ((book, text), &topic) in corpus.books().iter().zip(corpus.texts()).zip(topic_ids) {
            let mut components = Vec::with_capacity(width);
            components.extend(
                self.tfidf
                    .transform(text)
                    .as_slice()
                    .iter()
                    .map(|v| v * text_scale),
            );
            components.extend(
                self.genres
                    .transform(&book.genres)
                    .into_iter()
                    .map(|v| v * genre_scale),
            );
            components.extend(
                self.topic_encoding
                    .encode(topic, n_topics)
                    .into_iter()
                    .map(|v| v * topic_scale),
            );
            matrix.push_row(Vector::new(components))?;
        }
        Ok(matrix)
    }
}

/// Output of one encoding run
#[derive(Debug, Clone)]
pub struct EncodedFeatures {
    pub reference: FeatureMatrix,
    pub candidate: FeatureMatrix,
    pub reference_topics: Vec<usize>,
    pub candidate_topics: Vec<usize>,
    pub warnings: Vec<DegenerateModelWarning>,
}

/// Encodes a reference list and a candidate list into aligned matrices
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    config: EncoderConfig,
    normalizer: TextNormalizer,
}

impl FeatureEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self {
            config,
            normalizer: TextNormalizer::default(),
        }
    }

    #[inline]
    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Encode both lists against vocabularies fitted on `candidates`.
    ///
    /// Fails with `Error::DataInsufficient` before any computation when
    /// either list is empty.
    pub fn encode(&self, references: &[Book], candidates: &[Book]) -> Result<EncodedFeatures> {
        if candidates.is_empty() {
            return Err(Error::DataInsufficient("candidate corpus is empty".to_string()));
        }
        if references.is_empty() {
            return Err(Error::DataInsufficient("reference corpus is empty".to_string()));
        }

        let candidate_corpus = Corpus::new(candidates, &self.normalizer);
        let reference_corpus = Corpus::new(references, &self.normalizer);
        let vocabulary = FittedVocabulary::fit(&candidate_corpus, &reference_corpus, &self.config)?;

        let reference_topics = vocabulary.topic_ids(&reference_corpus);
        let candidate_topics = vocabulary.topic_ids(&candidate_corpus);
        let reference = vocabulary.encode_with_topics(&reference_corpus, &reference_topics)?;
        let candidate = vocabulary.encode_with_topics(&candidate_corpus, &candidate_topics)?;

        if reference.is_empty() || candidate.is_empty() {
            return Err(Error::DataInsufficient("encoding produced no feature rows".to_string()));
        }

        debug!(
            references = reference.n_rows(),
            candidates = candidate.n_rows(),
            width = vocabulary.width(),
            "encoded features"
        );

        Ok(EncodedFeatures {
            reference,
            candidate,
            reference_topics,
            candidate_topics,
            warnings: vocabulary.topics.warnings().to_vec(),
        })
    }
}

impl Default for FeatureEncoder {
    fn default() -> Self {
        Self::new(EncoderConfig::default())
    }
}

/// Builder for creating FeatureEncoder with custom options
#[derive(Debug, Clone, Default)]
pub struct EncoderBuilder {
    config: EncoderConfig,
}

impl EncoderBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topics(mut self, topics: usize) -> Self {
        self.config.topic.topics = topics;
        self
    }

    pub fn passes(mut self, passes: usize) -> Self {
        self.config.topic.passes = passes;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.topic.seed = seed;
        self
    }

    pub fn topic_encoding(mut self, encoding: TopicEncoding) -> Self {
        self.config.topic_encoding = encoding;
        self
    }

    pub fn weights(mut self, weights: FeatureWeights) -> Self {
        self.config.weights = weights;
        self
    }

    pub fn build(self) -> FeatureEncoder {
        FeatureEncoder::new(self.config)
    }
}
