use serde::{Deserialize, Serialize};

use crate::matcher::{FieldWeights, DEFAULT_SCORE_THRESHOLD};
use crate::pathformat::PathFormatter;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Destination path format. Validated while the configuration is read.
    #[serde(default)]
    pub path_format: PathFormatter,
    #[serde(default)]
    pub matching: MatchingConfig,
}

/// Matching configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MatchingConfig {
    /// Score needed to apply a release without review.
    #[serde(default = "default_score_threshold")]
    pub score_threshold: f64,
    /// Per-field weights; unlisted fields weigh 1.
    #[serde(default)]
    pub diff_weights: FieldWeights,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            score_threshold: default_score_threshold(),
            diff_weights: FieldWeights::default(),
        }
    }
}

fn default_score_threshold() -> f64 {
    DEFAULT_SCORE_THRESHOLD
}

/// Config summary for logs and `--show-config` output
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub path_format: SanitizedPathFormat,
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedPathFormat {
    pub source: String,
    pub root: String,
    pub parsed: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            path_format: SanitizedPathFormat {
                source: config.path_format.source().to_string(),
                root: config.path_format.root().to_string(),
                parsed: config.path_format.is_parsed(),
            },
            matching: config.matching.clone(),
        }
    }
}
