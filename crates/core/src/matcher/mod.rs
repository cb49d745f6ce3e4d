//! Release matching.
//!
//! Compares the tags of a local directory against a candidate catalogue
//! release and turns the weighted diff score into an accept/review decision.
//!
//! # Example
//!
//! ```
//! use shelver_core::matcher::{Decision, FieldWeights, Matcher};
//! use shelver_core::model::{Release, TagRecord, TagSet};
//!
//! let release = Release {
//!     title: "Hex Enduction Hour".to_string(),
//!     ..Default::default()
//! };
//! let tags = TagSet::new(vec![TagRecord {
//!     album: "Hex Enduction Hour".to_string(),
//!     ..Default::default()
//! }]);
//!
//! let matcher = Matcher::new(FieldWeights::new());
//! let result = matcher.evaluate(&release, &tags);
//! assert_eq!(result.decision, Decision::Accept);
//! ```

mod error;
mod scorer;
mod types;

pub use error::MatchError;
pub use scorer::{
    score, FIELD_ARTIST, FIELD_CATALOGUE_NUM, FIELD_LABEL, FIELD_MEDIA_FORMAT, FIELD_RELEASE,
};
pub use types::{Decision, FieldWeights, MatchResult, DEFAULT_WEIGHT, TRACK_WEIGHT_KEY};

use tracing::{info, warn};

use crate::config::MatchingConfig;
use crate::metrics::{MATCH_DECISIONS, MATCH_SCORE};
use crate::model::{FileTags, Release, TagSet};

/// Score needed for an automatic accept unless configured otherwise.
pub const DEFAULT_SCORE_THRESHOLD: f64 = 100.0;

/// Scores candidates and decides whether they can be applied unattended.
#[derive(Debug, Clone, PartialEq)]
pub struct Matcher {
    weights: FieldWeights,
    threshold: f64,
}

impl Matcher {
    /// Matcher with the default threshold.
    pub fn new(weights: FieldWeights) -> Self {
        Self {
            weights,
            threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }

    /// Set the score needed for an automatic accept.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn weights(&self) -> &FieldWeights {
        &self.weights
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Score `tags` against `release` and decide.
    pub fn evaluate<T: FileTags>(&self, release: &Release, tags: &TagSet<T>) -> MatchResult {
        let (score, diffs) = score(&self.weights, release, tags);
        let decision = if score >= self.threshold {
            Decision::Accept
        } else {
            Decision::Review
        };
        self.record(release, score, decision);
        MatchResult {
            score,
            diffs,
            decision,
        }
    }

    /// Score for display, but accept regardless of the score. Used when the
    /// operator has confirmed the match.
    pub fn evaluate_forced<T: FileTags>(&self, release: &Release, tags: &TagSet<T>) -> MatchResult {
        let (score, diffs) = score(&self.weights, release, tags);
        self.record(release, score, Decision::Accept);
        MatchResult {
            score,
            diffs,
            decision: Decision::Accept,
        }
    }

    fn record(&self, release: &Release, score: f64, decision: Decision) {
        MATCH_SCORE.with_label_values(&[]).observe(score);
        MATCH_DECISIONS
            .with_label_values(&[decision.as_str()])
            .inc();
        info!(
            release_id = %release.id,
            title = %release.title,
            score,
            threshold = self.threshold,
            decision = decision.as_str(),
            "Match evaluated"
        );
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::new(FieldWeights::default())
    }
}

impl From<&MatchingConfig> for Matcher {
    fn from(config: &MatchingConfig) -> Self {
        Self::new(config.diff_weights.clone()).with_threshold(config.score_threshold)
    }
}

/// Positional comparison is only meaningful when both sides have the same
/// number of tracks. The scorer tolerates a mismatch; callers that want to
/// refuse it check here first.
pub fn check_track_count<T: FileTags>(
    release: &Release,
    tags: &TagSet<T>,
) -> Result<(), MatchError> {
    let local = tags.len();
    let remote = release.track_count();
    if local != remote {
        warn!(local, remote, release_id = %release.id, "Track count mismatch");
        return Err(MatchError::TrackCountMismatch { local, remote });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Medium, TagRecord, Track};

    fn release() -> Release {
        Release {
            id: "rel-1".to_string(),
            title: "Grotesque".to_string(),
            label: "Rough Trade".to_string(),
            media: vec![Medium {
                tracks: vec![
                    Track {
                        position: 1,
                        title: "Pay Your Rates".to_string(),
                        ..Default::default()
                    },
                    Track {
                        position: 2,
                        title: "English Scheme".to_string(),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    fn tags(label: &str) -> TagSet {
        TagSet::new(
            ["Pay Your Rates", "English Scheme"]
                .iter()
                .map(|title| TagRecord {
                    album: "Grotesque".to_string(),
                    label: label.to_string(),
                    title: title.to_string(),
                    ..Default::default()
                })
                .collect(),
        )
    }

    #[test]
    fn test_perfect_match_is_accepted() {
        let result = Matcher::default().evaluate(&release(), &tags("Rough Trade"));
        assert_eq!(result.score, 100.0);
        assert!(result.is_accepted());
        assert_eq!(result.changed().count(), 0);
    }

    #[test]
    fn test_below_threshold_needs_review() {
        let result = Matcher::default().evaluate(&release(), &tags("Rough Trade Records"));
        assert!(result.score < 100.0);
        assert_eq!(result.decision, Decision::Review);
        let changed: Vec<&str> = result.changed().map(|d| d.field.as_str()).collect();
        assert_eq!(changed, vec!["label"]);
    }

    #[test]
    fn test_lower_threshold_accepts() {
        let matcher = Matcher::default().with_threshold(50.0);
        let result = matcher.evaluate(&release(), &tags("Rough Trade Records"));
        assert_eq!(result.decision, Decision::Accept);
    }

    #[test]
    fn test_forced_accept_keeps_score() {
        let matcher = Matcher::default();
        let result = matcher.evaluate_forced(&release(), &tags("Kamera"));
        assert!(result.is_accepted());
        assert!(result.score < 100.0);
    }

    #[test]
    fn test_from_matching_config() {
        let config = MatchingConfig {
            score_threshold: 90.0,
            diff_weights: FieldWeights::new().with("label", 0.0),
        };
        let matcher = Matcher::from(&config);
        assert_eq!(matcher.threshold(), 90.0);
        assert_eq!(matcher.weights().weight("label"), 0.0);
    }

    #[test]
    fn test_check_track_count() {
        assert!(check_track_count(&release(), &tags("x")).is_ok());

        let one = TagSet::new(vec![TagRecord::default()]);
        let err = check_track_count(&release(), &one).unwrap_err();
        assert_eq!(err, MatchError::TrackCountMismatch { local: 1, remote: 2 });
        assert!(!err.is_retryable());
    }
}
