//! Error types for Readlog Core
//!
//! Validation problems are not errors here: the schema returns them as
//! structured [`ValidationErrors`](crate::schema::ValidationErrors) data.

use thiserror::Error;

/// Result type alias using ReadlogError
pub type Result<T> = std::result::Result<T, ReadlogError>;

/// Top-level error type for all Readlog operations
#[derive(Debug, Error)]
pub enum ReadlogError {
    #[error("Submit error: {0}")]
    Submit(#[from] SubmitError),
}

/// Errors raised by a storage backend.
///
/// [`Persistence`](crate::storage::Persistence) logs and swallows these, so
/// they never reach [`ReadlogError`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Backend error: {0}")]
    BackendError(String),
}

/// Errors returned by the final submit callback
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The entry could not be delivered
    #[error("Submission failed: {0}")]
    Failed(String),
}
