//! Error types for the path formatter.

use thiserror::Error;

/// Errors raised while parsing or executing a path format.
///
/// `InvalidFormat`, `AmbiguousFormat` and `BadData` are configuration errors
/// detected once at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Empty, whitespace-only, malformed, or unknown fields/functions.
    #[error("Invalid path format: {reason}")]
    InvalidFormat { reason: String },

    /// Output does not vary by release or by track.
    #[error("Ambiguous path format: {reason}")]
    AmbiguousFormat { reason: String },

    /// Output has an empty path segment when identifiers are missing.
    #[error("Path format produces a broken path for missing data: {reason}")]
    BadData { reason: String },

    /// `execute` called before a successful `parse`.
    #[error("Path format has not been parsed")]
    NotParsed,

    /// Template evaluation failed.
    #[error("Failed to render path: {0}")]
    Render(#[from] RenderError),
}

impl FormatError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidFormat {
            reason: reason.into(),
        }
    }

    pub(crate) fn ambiguous(reason: impl Into<String>) -> Self {
        Self::AmbiguousFormat {
            reason: reason.into(),
        }
    }

    pub(crate) fn bad_data(reason: impl Into<String>) -> Self {
        Self::BadData {
            reason: reason.into(),
        }
    }

    /// Whether this error is retryable. Every variant is a deterministic
    /// function of the template text and the data, so none is.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Whether this error points at the configured template.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFormat { .. } | Self::AmbiguousFormat { .. } | Self::BadData { .. }
        )
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidFormat { .. } => "invalid_format",
            Self::AmbiguousFormat { .. } => "ambiguous_format",
            Self::BadData { .. } => "bad_data",
            Self::NotParsed => "not_parsed",
            Self::Render(_) => "render",
        }
    }
}

/// Errors raised while evaluating a compiled template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A function received a value of the wrong type.
    #[error("{func}: expected {expected} argument, got {got}")]
    ArgumentType {
        func: &'static str,
        expected: &'static str,
        got: &'static str,
    },

    /// A function argument is outside the range it accepts.
    #[error("{func}: {value} is out of range {min}..={max}")]
    ArgumentRange {
        func: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A value that has no text form was written to the output.
    #[error("Cannot write {kind} value to a path")]
    NotPrintable { kind: &'static str },
}
