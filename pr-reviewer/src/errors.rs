//! Crate-wide error hierarchy for pr-reviewer.
//!
//! - [`ReviewError`] is what a review run can fail with; the HTTP layer maps
//!   each variant to a status code and a stable error code.
//! - [`ConfigError`] covers startup configuration of the reviewer.
//!
//! Completion failures are deliberately absent: the generator degrades to an
//! empty review instead of failing the run.

use git_providers::ProviderError;
use thiserror::Error;

/// Convenient alias for review results.
pub type ReviewResult<T> = Result<T, ReviewError>;

/// Failure of a single review run.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The webhook body is not JSON or lacks the pull request identifiers.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Reading pull request data from the repository provider failed.
    #[error("upstream fetch failed: {0}")]
    UpstreamFetchFailed(#[source] ProviderError),

    /// Creating the review comment failed.
    #[error("upstream publish failed: {0}")]
    UpstreamPublishFailed(#[source] ProviderError),
}

impl ReviewError {
    /// Stable machine-readable code used in HTTP error envelopes.
    pub fn code(&self) -> &'static str {
        match self {
            ReviewError::InvalidPayload(_) => "INVALID_PAYLOAD",
            ReviewError::UpstreamFetchFailed(_) => "UPSTREAM_FETCH_FAILED",
            ReviewError::UpstreamPublishFailed(_) => "UPSTREAM_PUBLISH_FAILED",
        }
    }
}

/// Reviewer configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A number failed to parse.
    #[error("invalid number in {0}")]
    InvalidNumber(&'static str),

    /// A value is outside its accepted set.
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(
            ReviewError::InvalidPayload("x".into()).code(),
            "INVALID_PAYLOAD"
        );
        assert_eq!(
            ReviewError::UpstreamFetchFailed(ProviderError::NotFound).code(),
            "UPSTREAM_FETCH_FAILED"
        );
        assert_eq!(
            ReviewError::UpstreamPublishFailed(ProviderError::Forbidden).code(),
            "UPSTREAM_PUBLISH_FAILED"
        );
    }

    #[test]
    fn provider_cause_is_kept_in_message() {
        let err = ReviewError::UpstreamFetchFailed(ProviderError::Server(502));
        assert_eq!(err.to_string(), "upstream fetch failed: server error: status 502");
    }
}
