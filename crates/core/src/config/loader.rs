use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix of environment variables that override file settings.
pub const ENV_PREFIX: &str = "SHELVER_";

/// Load configuration from file with environment variable overrides
///
/// Nested keys are separated by a double underscore:
/// `SHELVER_MATCHING__SCORE_THRESHOLD=95` overrides `matching.score_threshold`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
path_format = "/albums/{{ artistCredit .Release.Artists }}/{{ .Release.Title }}/{{ .TrackNum }}"

[matching]
score_threshold = 95.0

[matching.diff_weights]
label = 0
"catalogue num" = 0.5
"#;
        let config = load_config_from_str(toml).unwrap();
        assert!(config.path_format.is_parsed());
        assert_eq!(config.path_format.root(), "/albums");
        assert_eq!(config.matching.score_threshold, 95.0);
        assert_eq!(config.matching.diff_weights.weight("label"), 0.0);
        assert_eq!(config.matching.diff_weights.weight("catalogue num"), 0.5);
    }

    #[test]
    fn test_load_config_from_str_ambiguous_format() {
        let toml = r#"
path_format = "/albums/{{ .Release.Title }}"
"#;
        let result = load_config_from_str(toml);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
        assert!(err.to_string().contains("Ambiguous path format"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::FileNotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
path_format = "/m/{{{{ .Release.Title }}}}/{{{{ pad0 2 .TrackNum }}}}{{{{ .Ext }}}}"

[matching]
score_threshold = 90.0
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.matching.score_threshold, 90.0);
        assert_eq!(
            config.path_format.source(),
            "/m/{{ .Release.Title }}/{{ pad0 2 .TrackNum }}{{ .Ext }}"
        );
    }
}
