//! Text normalization for free-text book fields
//!
//! Lowercases, replaces non-word characters with whitespace and drops
//! stopwords. Degenerate input (empty or all-stopword text) normalizes to
//! the empty string.

use ahash::AHashSet;
use std::sync::OnceLock;

/// English stopwords (NLTK list). Contractions appear only as the fragments
/// `tokens` splits them into (`don`, `t`, `ll`).
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers",
    "herself", "it", "its", "itself", "they", "them", "their", "theirs", "themselves",
    "what", "which", "who", "whom", "this", "that", "these", "those", "am", "is", "are",
    "was", "were", "be", "been", "being", "have", "has", "had", "having", "do", "does",
    "did", "doing", "a", "an", "the", "and", "but", "if", "or", "because", "as",
    "until", "while", "of", "at", "by", "for", "with", "about", "against", "between",
    "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then",
    "once", "here", "there", "when", "where", "why", "how", "all", "any", "both",
    "each", "few", "more", "most", "other", "some", "such", "no", "nor", "not", "only",
    "own", "same", "so", "than", "too", "very", "s", "t", "can", "will", "just", "don",
    "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "couldn",
    "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn", "needn",
    "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Stateless text normalizer with a fixed stopword set
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    stopwords: AHashSet<String>,
}

impl TextNormalizer {
    /// Create a normalizer with a custom stopword set (matched lowercase)
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: stopwords
                .into_iter()
                .map(|s| s.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Shared normalizer for English text
    pub fn english() -> &'static TextNormalizer {
        static ENGLISH: OnceLock<TextNormalizer> = OnceLock::new();
        ENGLISH.get_or_init(|| TextNormalizer::new(ENGLISH_STOPWORDS.iter().copied()))
    }

    #[inline]
    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Lowercased, stopword-free tokens of `text`
    pub fn tokens(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !is_word_char(c))
            .filter(|token| !token.is_empty() && !self.is_stopword(token))
            .map(str::to_string)
            .collect()
    }

    /// Normalize `text` to single-space separated tokens
    pub fn normalize(&self, text: &str) -> String {
        self.tokens(text).join(" ")
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::english().clone()
    }
}

/// Normalize with the English stopword list
#[inline]
pub fn normalize(text: &str) -> String {
    TextNormalizer::english().normalize(text)
}

#[inline]
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_basic() {
        assert_eq!(normalize("A Wizard goes on a Quest!"), "wizard goes quest");
    }

    #[test]
    fn test_punctuation_becomes_whitespace() {
        assert_eq!(normalize("sword-and-sorcery,epic"), "sword sorcery epic");
        assert_eq!(normalize("snake_case stays"), "snake_case stays");
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("the and of it"), "");
        assert_eq!(normalize("!!! ???"), "");
    }

    #[test]
    fn test_apostrophes_split_tokens() {
        // "don't" splits into "don" and "t", both stopwords
        assert_eq!(normalize("Don't panic"), "panic");
    }

    #[test]
    fn test_every_stopword_is_a_single_token() {
        for word in ENGLISH_STOPWORDS {
            assert_eq!(TextNormalizer::new(Vec::<&str>::new()).tokens(word), vec![*word]);
        }
        assert_eq!(normalize("you're shouldn't won't"), "");
    }

    #[test]
    fn test_unicode_words_kept() {
        assert_eq!(normalize("Café Société"), "café société");
    }

    #[test]
    fn test_custom_stopwords() {
        let normalizer = TextNormalizer::new(["Book", "novel"]);
        assert_eq!(normalizer.normalize("A book, a NOVEL, a story"), "a a a story");
    }
}
