//! Account and catalogue tools.

use std::fmt;
use std::str::FromStr;

use jimeng_domain::{DomainError, EnvConfig, RequestDescriptor, SubmissionState};
use tracing::{debug, info, warn};

use super::SubmitError;
use crate::ports::GenerationTransport;
use crate::request_builder::{
    build_models_request, build_token_check_request, build_token_points_request,
};

/// A one-shot API tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Checks whether the token is valid.
    Check,
    /// Reads the remaining credit of the token.
    Points,
    /// Lists the models the server offers.
    Models,
}

impl Tool {
    /// Returns all tools.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Check, Self::Points, Self::Models]
    }

    /// Returns the command name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::Points => "points",
            Self::Models => "models",
        }
    }

    /// Returns true if the tool cannot run without a token.
    #[must_use]
    pub const fn requires_token(self) -> bool {
        !matches!(self, Self::Models)
    }

    /// Builds the request for this tool.
    #[must_use]
    pub fn request(self, config: &EnvConfig) -> RequestDescriptor {
        match self {
            Self::Check => build_token_check_request(config),
            Self::Points => build_token_points_request(config),
            Self::Models => build_models_request(config),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tool {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|tool| tool.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::Validation(format!("unknown tool: {s}")))
    }
}

/// Use case for running a tool request.
pub struct RunTool<T> {
    transport: T,
}

impl<T: GenerationTransport> RunTool<T> {
    /// Creates a new `RunTool` use case.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Sends the tool request and returns the settled state.
    ///
    /// # Errors
    /// Returns [`SubmitError::MissingToken`] when the tool needs a token and
    /// none is configured.
    pub async fn execute(
        &self,
        tool: Tool,
        config: &EnvConfig,
    ) -> Result<SubmissionState, SubmitError> {
        if tool.requires_token() && !config.has_token() {
            return Err(SubmitError::MissingToken);
        }

        let request = tool.request(config);
        debug!(%tool, url = %request.url, "sending tool request");

        let state = match self.transport.send(&request).await {
            Ok(response) if response.is_success() => {
                info!(%tool, "tool request succeeded");
                SubmissionState::success(response.body, None)
            }
            Ok(response) => {
                warn!(%tool, status = response.status, "tool request rejected");
                SubmissionState::remote_error(response.body)
            }
            Err(e) => {
                warn!(%tool, error = %e, "tool request failed");
                SubmissionState::transport_error(e.to_string())
            }
        };
        Ok(state)
    }
}
