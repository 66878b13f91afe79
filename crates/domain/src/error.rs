//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The region name is not one of the known deployment variants.
    #[error("unknown region: {0}")]
    InvalidRegion(String),

    /// The generation type is not one of the known kinds.
    #[error("unknown generation type: {0}")]
    InvalidGenerationType(String),

    /// A form field failed validation.
    #[error("{0}")]
    Validation(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
