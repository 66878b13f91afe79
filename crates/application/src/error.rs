//! Application error types

use jimeng_domain::DomainError;
use thiserror::Error;

use crate::ports::{StorageError, TransportError};
use crate::use_cases::SubmitError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// A storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The request could not be sent.
    #[error("HTTP error: {0}")]
    Transport(#[from] TransportError),

    /// A submission was refused before sending.
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
