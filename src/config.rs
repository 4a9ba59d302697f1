//! Recommendation settings
//!
//! Loaded from a JSON file (missing keys take defaults) and then
//! overridden by command-line flags.

use bookrec_catalog::{Era, YearWindow};
use bookrec_core::{Error, Result};
use bookrec_features::{
    EncoderConfig, FeatureWeights, TopicConfig, TopicEncoding, DEFAULT_PASSES, DEFAULT_SEED,
    DEFAULT_TOPICS,
};
use bookrec_similarity::DEFAULT_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RecommendConfig {
    /// Number of topics K
    pub topics: usize,
    /// Maximum number of recommendations N
    pub limit: usize,
    /// Earliest publication year kept among candidates
    pub min_year: Option<i32>,
    /// Latest publication year kept among candidates
    pub max_year: Option<i32>,
    /// Seed for the topic model
    pub seed: u64,
    /// Gibbs sweeps when fitting the topic model
    pub passes: usize,
    pub topic_encoding: TopicEncoding,
    pub weights: FeatureWeights,
    /// Drop candidates that are themselves reference books
    pub exclude_references: bool,
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            topics: DEFAULT_TOPICS,
            limit: DEFAULT_LIMIT,
            min_year: None,
            max_year: None,
            seed: DEFAULT_SEED,
            passes: DEFAULT_PASSES,
            topic_encoding: TopicEncoding::default(),
            weights: FeatureWeights::default(),
            exclude_references: false,
        }
    }
}

impl RecommendConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            return Err(Error::InvalidConfig("limit must be at least 1".to_string()));
        }
        self.encoder_config().validate()?;
        self.year_window()?;
        Ok(())
    }

    pub fn encoder_config(&self) -> EncoderConfig {
        EncoderConfig {
            topic: TopicConfig {
                topics: self.topics,
                passes: self.passes,
                seed: self.seed,
            },
            topic_encoding: self.topic_encoding,
            weights: self.weights,
        }
    }

    pub fn year_window(&self) -> Result<YearWindow> {
        YearWindow::new(self.min_year, self.max_year)
    }

    /// Fill unset year bounds from the span of `eras`
    pub fn restrict_to_eras(&mut self, eras: &[Era]) {
        if let Some(window) = YearWindow::spanning(eras) {
            self.min_year = self.min_year.or(window.min);
            self.max_year = self.max_year.or(window.max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RecommendConfig::default();
        assert_eq!(config.topics, 5);
        assert_eq!(config.limit, 20);
        assert!(config.validate().is_ok());
        assert!(config.year_window().unwrap().is_unbounded());
    }

    #[test]
    fn test_partial_json() {
        let config = RecommendConfig::from_json(
            r#"{"limit": 5, "min_year": 1900, "weights": {"topic": 0.5}}"#,
        )
        .unwrap();
        assert_eq!(config.limit, 5);
        assert_eq!(config.topics, DEFAULT_TOPICS);
        assert_eq!(config.min_year, Some(1900));
        assert_eq!(config.weights.topic, 0.5);
        assert_eq!(config.weights.text, 1.0);
    }

    #[test]
    fn test_restrict_to_eras() {
        let eras = [Era::new(1941, 1960).unwrap(), Era::new(1921, 1940).unwrap()];
        let mut config = RecommendConfig::default();
        config.restrict_to_eras(&eras);
        assert_eq!((config.min_year, config.max_year), (Some(1921), Some(1960)));

        let mut config = RecommendConfig {
            max_year: Some(1950),
            ..RecommendConfig::default()
        };
        config.restrict_to_eras(&eras);
        assert_eq!((config.min_year, config.max_year), (Some(1921), Some(1950)));

        let mut config = RecommendConfig::default();
        config.restrict_to_eras(&[]);
        assert!(config.year_window().unwrap().is_unbounded());
    }

    #[test]
    fn test_invalid_values() {
        for json in [
            r#"{"limit": 0}"#,
            r#"{"topics": 0}"#,
            r#"{"min_year": 2000, "max_year": 1900}"#,
            r#"{"weights": {"genre": -1.0}}"#,
        ] {
            assert!(
                matches!(RecommendConfig::from_json(json), Err(Error::InvalidConfig(_))),
                "expected invalid config for {}",
                json
            );
        }
        assert!(matches!(
            RecommendConfig::from_json("[]"),
            Err(Error::Serialization(_))
        ));
    }
}
