//! Error types for the license request form.
//!
//! Every failure is contained by the controller: validation problems come
//! back as a typed [`ValidationError`], trigger problems as a
//! [`TriggerError`], and nothing here is ever allowed to panic the caller.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type GenResult<T> = Result<T, GenError>;

/// Reasons a form snapshot is refused before any request target is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The user name field is empty.
    #[error("name is required")]
    EmptyName,
    /// The version field is empty.
    #[error("version is required")]
    EmptyVersion,
    /// The seat count is not an integer.
    #[error("seat count '{0}' is not a whole number")]
    InvalidCount(String),
    /// The seat count is an integer outside the accepted range.
    #[error("seat count {value} is outside {min}..={max}")]
    CountOutOfRange { value: i64, min: u32, max: u32 },
}

/// Failures of the download mechanism itself.
///
/// These never describe the server's answer; the controller does not see it.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// The request target could not be turned into a fetchable URL.
    #[error("invalid download target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },
    /// The destination for the downloaded file is unusable.
    #[error("download destination unavailable: {0}")]
    Io(#[from] std::io::Error),
    /// The environment refused to start the download.
    #[error("download refused: {0}")]
    Refused(String),
}

/// Crate-wide error.
#[derive(Debug, Error)]
pub enum GenError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("download trigger failed: {0}")]
    Trigger(#[from] TriggerError),

    /// The server answered but no artifact was saved.
    #[error("download failed: {0}")]
    Download(String),

    /// A submission is already in flight; the submit control is disabled.
    #[error("a submission is already in progress")]
    Busy,

    #[error("storage error: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl GenError {
    /// Returns true when the error came from input validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, GenError::Validation(_))
    }
}
