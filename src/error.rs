//! Error types for the assessment core.
//!
//! Aggregation, catalog, and store operations return [`AssessmentError`].
//! Insight provider failures use [`ProviderError`] and are always recovered
//! by the insight service, so they never reach callers of the core.

use thiserror::Error;

/// Errors surfaced by scoring, catalog, and store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssessmentError {
    /// A score or weight is outside its contracted range, or the input set is unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A referenced use case, summary, or score set does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A use case with the same identifier already exists.
    #[error("use case id already exists: {0}")]
    DuplicateId(String),

    /// The backing store failed; the operation was not applied.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<rusqlite::Error> for AssessmentError {
    fn from(err: rusqlite::Error) -> Self {
        AssessmentError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AssessmentError {
    fn from(err: serde_json::Error) -> Self {
        AssessmentError::Storage(format!("serialization: {}", err))
    }
}

/// Result alias for core operations.
pub type AssessmentResult<T> = Result<T, AssessmentError>;

/// Failure of a remote insight generator.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No remote generator is configured.
    #[error("remote insight generation is disabled")]
    Disabled,

    /// The request could not be delivered.
    #[error("transport error: {0}")]
    Transport(String),

    /// The generator did not answer within the allotted time.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The generator answered with a non-success status.
    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    /// The response could not be interpreted as insights.
    #[error("malformed response: {0}")]
    Malformed(String),
}
