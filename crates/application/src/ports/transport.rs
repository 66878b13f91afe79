//! Generation transport port

use async_trait::async_trait;
use jimeng_domain::RequestDescriptor;
use serde_json::Value;

/// Errors raised when a request gets no usable answer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The descriptor URL cannot be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Could not connect to the server.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request timed out.
    #[error("request timed out")]
    Timeout,

    /// The request body could not be encoded.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Answer received from the API, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as JSON; non-JSON bodies are wrapped in a string.
    pub body: Value,
}

impl TransportResponse {
    /// Creates a response.
    #[must_use]
    pub const fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Port for sending request descriptors over HTTP.
#[async_trait]
pub trait GenerationTransport: Send + Sync {
    /// Sends the request exactly as described.
    ///
    /// Non-success statuses are returned as responses, not errors.
    ///
    /// # Errors
    ///
    /// Returns an error if no response could be obtained.
    async fn send(&self, request: &RequestDescriptor) -> Result<TransportResponse, TransportError>;
}
