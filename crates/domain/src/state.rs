//! Submission state types for form binding.
//!
//! Each form drives one submission at a time through this state machine:
//! `Idle → Loading → Success | Error`, and back to `Loading` on the next
//! submit once the previous one has settled.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Summary shown when an error payload carries no `detail` text.
pub const GENERIC_FAILURE: &str = "generation failed";

/// Represents the current state of a form submission.
///
/// - `Idle`: nothing sent yet
/// - `Loading`: request in flight, resubmission disabled
/// - `Success`: raw response available for the viewer
/// - `Error`: raw error payload available for the viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    /// No request has been sent yet.
    #[default]
    Idle,

    /// Request is in progress.
    Loading {
        /// When the request started. Not serializable.
        #[serde(skip)]
        started_at: Option<std::time::Instant>,
    },

    /// The API answered with a success status.
    Success {
        /// Raw response body.
        response: Value,
        /// Id of the history record written for this response, if any.
        history_id: Option<String>,
    },

    /// The request failed.
    Error {
        /// Failure category.
        kind: SubmissionErrorKind,
        /// Short summary for a toast.
        message: String,
        /// Raw error payload, or a synthesized `{"error": message}`.
        payload: Value,
    },
}

impl SubmissionState {
    /// Creates a Loading state with the current instant.
    #[must_use]
    pub fn loading() -> Self {
        Self::Loading {
            started_at: Some(std::time::Instant::now()),
        }
    }

    /// Creates a Success state.
    #[must_use]
    pub const fn success(response: Value, history_id: Option<String>) -> Self {
        Self::Success {
            response,
            history_id,
        }
    }

    /// Creates an Error state from a remote error payload.
    ///
    /// The summary is the payload's `detail` string when it has one.
    #[must_use]
    pub fn remote_error(payload: Value) -> Self {
        let message = payload
            .get("detail")
            .and_then(Value::as_str)
            .unwrap_or(GENERIC_FAILURE)
            .to_string();
        Self::Error {
            kind: SubmissionErrorKind::Remote,
            message,
            payload,
        }
    }

    /// Creates an Error state for a request that never got an answer.
    #[must_use]
    pub fn transport_error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Error {
            kind: SubmissionErrorKind::Transport,
            payload: json!({ "error": message }),
            message: GENERIC_FAILURE.to_string(),
        }
    }

    /// Returns true if a request is in progress.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// Returns true if the last request succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns true if the last request failed.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Returns the JSON to show in the response viewer.
    #[must_use]
    pub const fn viewer_payload(&self) -> Option<&Value> {
        match self {
            Self::Success { response, .. } => Some(response),
            Self::Error { payload, .. } => Some(payload),
            Self::Idle | Self::Loading { .. } => None,
        }
    }
}

/// Categories of submission failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionErrorKind {
    /// The API answered with a non-success status.
    Remote,
    /// No usable answer: connection, timeout, or unreadable body.
    Transport,
}
