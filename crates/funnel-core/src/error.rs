//! Shared error type for the funnel crates

use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// A required field was missing or empty
    #[error("Validation failed for field '{field}': {message}")]
    Validation { field: String, message: String },

    /// Storage backend failed (session flag store, lead records)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Result payload hand-off failed
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// Question bank or scoring configuration is unusable
    #[error("Invalid domain data: {0}")]
    InvalidDomainData(String),
}

impl Error {
    /// Convenience constructor for validation errors
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
