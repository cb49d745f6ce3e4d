use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::diff::DiffRecord;

/// Weight applied to every field not listed in a [`FieldWeights`] map.
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Key that sets the weight of every `track N` field at once.
pub const TRACK_WEIGHT_KEY: &str = "track";

/// Per-field weights, keyed by diff field name ("label", "track 3", ...).
///
/// A weight of 0 keeps the field in the report but removes it from the score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldWeights(HashMap<String, f64>);

impl FieldWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the weight of one field.
    pub fn with(mut self, field: impl Into<String>, weight: f64) -> Self {
        self.0.insert(field.into(), weight);
        self
    }

    /// Weight for `field`. Track fields fall back to the `track` key, then
    /// everything falls back to [`DEFAULT_WEIGHT`].
    pub fn weight(&self, field: &str) -> f64 {
        if let Some(w) = self.0.get(field) {
            return *w;
        }
        if field.starts_with("track ") {
            if let Some(w) = self.0.get(TRACK_WEIGHT_KEY) {
                return *w;
            }
        }
        DEFAULT_WEIGHT
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for FieldWeights {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// What the import pipeline should do with a scored candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Apply the release without asking.
    Accept,
    /// Show the diff to the operator.
    Review,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Accept => "accept",
            Decision::Review => "review",
        }
    }
}

/// Outcome of matching a tag set against a release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Confidence score, 100 for a perfect match. Can be negative.
    pub score: f64,
    /// One record per compared field, in comparison order.
    pub diffs: Vec<DiffRecord>,
    pub decision: Decision,
}

impl MatchResult {
    pub fn is_accepted(&self) -> bool {
        self.decision == Decision::Accept
    }

    /// Records whose values differ.
    pub fn changed(&self) -> impl Iterator<Item = &DiffRecord> {
        self.diffs.iter().filter(|d| !d.equal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_lookup_order() {
        let weights = FieldWeights::new()
            .with("label", 0.0)
            .with("track", 2.0)
            .with("track 3", 5.0);

        assert_eq!(weights.weight("label"), 0.0);
        assert_eq!(weights.weight("track 1"), 2.0);
        assert_eq!(weights.weight("track 3"), 5.0);
        assert_eq!(weights.weight("artist"), DEFAULT_WEIGHT);
        // Only "track N" fields use the track key.
        assert_eq!(FieldWeights::new().with("track", 3.0).weight("tracker"), 1.0);
    }

    #[test]
    fn test_weights_deserialize_from_map() {
        let weights: FieldWeights =
            serde_json::from_str(r#"{"label": 0.5, "catalogue num": 2}"#).unwrap();
        assert_eq!(weights.weight("label"), 0.5);
        assert_eq!(weights.weight("catalogue num"), 2.0);
    }

    #[test]
    fn test_decision_serialization() {
        assert_eq!(serde_json::to_string(&Decision::Accept).unwrap(), "\"accept\"");
        assert_eq!(Decision::Review.as_str(), "review");
    }
}
