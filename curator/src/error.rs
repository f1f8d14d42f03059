//! Curator-specific error types

use shared::SharedError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CuratorError {
    #[error("Item with ID {item_id} not found")]
    ItemNotFound { item_id: String },

    #[error("One or both items not found")]
    ItemsNotFound { first: String, second: String },

    #[error("No dashboard items file found for case {case}")]
    DocumentNotFound { case: String },

    #[error("Invalid arguments: {message}")]
    InvalidArgument { message: String },

    #[error("Unknown function: {name}")]
    UnknownAction { name: String },

    #[error("Action targets case {requested} but this run is for case {expected}")]
    CaseMismatch { expected: String, requested: String },

    #[error("Storage operation failed: {operation} on {path}: {message}")]
    StorageError { operation: String, path: String, message: String },

    #[error("Corrupt document {path}: {message}")]
    CorruptDocument { path: String, message: String },

    #[error("Decision oracle failed: {0}")]
    OracleError(#[from] OracleFailure),

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("Shared component error: {0}")]
    SharedError(#[from] SharedError),
}

impl CuratorError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        CuratorError::InvalidArgument { message: message.into() }
    }

    pub fn config(field: impl Into<String>) -> Self {
        CuratorError::ConfigurationError { field: field.into() }
    }

    pub fn storage(operation: &str, path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        CuratorError::StorageError {
            operation: operation.to_string(),
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    /// Whether the error means a referenced item or document does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CuratorError::ItemNotFound { .. } | CuratorError::ItemsNotFound { .. } | CuratorError::DocumentNotFound { .. }
        )
    }
}

pub type CuratorResult<T> = Result<T, CuratorError>;

/// Failure of a single decision-oracle round trip
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleFailure {
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limit exceeded")]
    RateLimitExceeded,

    #[error("service unavailable")]
    ServiceUnavailable,

    #[error("request timed out")]
    Timeout,

    #[error("server error: {0}")]
    ServerError(String),

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}
