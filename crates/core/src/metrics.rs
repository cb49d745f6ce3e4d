//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Path formats (validations, rendered paths)
//! - Matching (scores, decisions)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Path Format Metrics
// =============================================================================

/// Path format validations by result.
pub static TEMPLATE_VALIDATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "shelver_template_validations_total",
            "Total path format validations",
        ),
        &["result"], // "ok", "invalid_format", "ambiguous_format", "bad_data"
    )
    .unwrap()
});

/// Paths rendered total.
pub static PATHS_RENDERED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("shelver_paths_rendered_total", "Total destination paths rendered").unwrap()
});

// =============================================================================
// Matching Metrics
// =============================================================================

/// Match scores.
pub static MATCH_SCORE: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new("shelver_match_score", "Distribution of match scores")
            .buckets(vec![0.0, 25.0, 50.0, 75.0, 90.0, 95.0, 99.0, 100.0]),
        &[],
    )
    .unwrap()
});

/// Match decisions by outcome.
pub static MATCH_DECISIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("shelver_match_decisions_total", "Total match decisions"),
        &["decision"], // "accept", "review"
    )
    .unwrap()
});

/// Get all core metrics for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Path formats
        Box::new(TEMPLATE_VALIDATIONS.clone()),
        Box::new(PATHS_RENDERED.clone()),
        // Matching
        Box::new(MATCH_SCORE.clone()),
        Box::new(MATCH_DECISIONS.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;

    #[test]
    fn test_all_metrics_register() {
        let registry = Registry::new();
        for metric in all_metrics() {
            registry.register(metric).unwrap();
        }
        TEMPLATE_VALIDATIONS.with_label_values(&["ok"]).inc();
        MATCH_DECISIONS.with_label_values(&["review"]).inc();
        let names: Vec<String> = registry
            .gather()
            .iter()
            .map(|f| f.get_name().to_string())
            .collect();
        assert!(names.contains(&"shelver_template_validations_total".to_string()));
        assert!(names.contains(&"shelver_match_decisions_total".to_string()));
    }
}
