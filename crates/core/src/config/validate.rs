use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - A path format is configured (its content is checked while parsing)
/// - Score threshold is finite
/// - Diff weights are finite and not negative
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if !config.path_format.is_parsed() {
        return Err(ConfigError::ValidationError(
            "path_format is required".to_string(),
        ));
    }

    // Matching validation
    let threshold = config.matching.score_threshold;
    if !threshold.is_finite() {
        return Err(ConfigError::ValidationError(format!(
            "matching.score_threshold must be a finite number, got {}",
            threshold
        )));
    }

    let mut weights: Vec<(&str, f64)> = config.matching.diff_weights.iter().collect();
    weights.sort_by(|a, b| a.0.cmp(b.0));
    for (field, weight) in weights {
        if !weight.is_finite() || weight < 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "matching.diff_weights.{:?} must be a non-negative number, got {}",
                field, weight
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchingConfig;
    use crate::matcher::FieldWeights;

    fn valid_config() -> Config {
        Config {
            path_format: "/m/{{ .Release.Title }}/{{ .TrackNum }}".parse().unwrap(),
            matching: MatchingConfig::default(),
        }
    }

    #[test]
    fn test_validate_valid_config() {
        let mut config = valid_config();
        config.matching.diff_weights = FieldWeights::new().with("label", 0.0).with("track", 2.5);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_missing_path_format_fails() {
        let config = Config::default();
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_negative_weight_fails() {
        let mut config = valid_config();
        config.matching.diff_weights = FieldWeights::new().with("label", -1.0);
        let result = validate_config(&config);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("label"));
    }

    #[test]
    fn test_validate_non_finite_values_fail() {
        let mut config = valid_config();
        config.matching.diff_weights = FieldWeights::new().with("release", f64::NAN);
        assert!(validate_config(&config).is_err());

        let mut config = valid_config();
        config.matching.score_threshold = f64::INFINITY;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_negative_threshold_is_allowed() {
        // Scores can be negative; a negative threshold accepts everything.
        let mut config = valid_config();
        config.matching.score_threshold = -50.0;
        assert!(validate_config(&config).is_ok());
    }
}
