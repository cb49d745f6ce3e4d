use thiserror::Error;

/// Errors a matching caller may need to act on.
///
/// The scorer itself never fails; this covers checks the import pipeline runs
/// before trusting a positional comparison.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("Track count mismatch: {local} local files, {remote} release tracks")]
    TrackCountMismatch { local: usize, remote: usize },
}

impl MatchError {
    /// The same tags and release always produce the same mismatch.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
