//! Application-level errors (wraps domain errors)

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("{variable} is required\n  {hint}")]
    MissingToken {
        variable: &'static str,
        hint: &'static str,
    },

    #[error("{operation} failed ({status}): {message}")]
    Api {
        operation: &'static str,
        status: u16,
        message: String,
    },

    #[error("{operation}: unexpected response: {message}")]
    InvalidResponse {
        operation: &'static str,
        message: String,
    },

    #[error("image file not found: {0}")]
    AssetNotFound(PathBuf),

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
