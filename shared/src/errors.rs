//! Shared error types for the dashboard curation system

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid component: {message}")]
    InvalidComponent { message: String },

    #[error("Serialization failed: {message}")]
    SerializationError { message: String },
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        SharedError::SerializationError { message: err.to_string() }
    }
}

pub type SharedResult<T> = Result<T, SharedError>;
