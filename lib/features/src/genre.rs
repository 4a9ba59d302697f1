//! Multi-label genre encoding over a fitted genre vocabulary

use ahash::AHashMap;
use std::collections::BTreeSet;

/// Sorted set of genre labels observed in a corpus
#[derive(Debug, Clone, PartialEq)]
pub struct GenreVocabulary {
    labels: Vec<String>,
    index: AHashMap<String, usize>,
}

impl GenreVocabulary {
    pub fn fit<'a, I>(genre_sets: I) -> Self
    where
        I: IntoIterator<Item = &'a BTreeSet<String>>,
    {
        let labels: BTreeSet<&String> = genre_sets.into_iter().flatten().collect();
        let labels: Vec<String> = labels.into_iter().cloned().collect();
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();

        Self { labels, index }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Multi-hot vector; labels outside the vocabulary contribute nothing
    pub fn transform(&self, genres: &BTreeSet<String>) -> Vec<f32> {
        let mut encoded = vec![0.0f32; self.len()];
        for genre in genres {
            if let Some(&i) = self.index.get(genre) {
                encoded[i] = 1.0;
            }
        }
        encoded
    }
}
