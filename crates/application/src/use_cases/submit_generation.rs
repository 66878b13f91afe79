//! Submit generation use case.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use jimeng_domain::generation::extract_result_urls;
use jimeng_domain::{DomainError, EnvConfig, GenerationForm, NewHistoryItem, SubmissionState};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::history_store::HistoryStore;
use crate::ports::{Clock, GenerationTransport, KeyValueStore};
use crate::request_builder::build_generation_request;

/// Reasons a submission is refused before anything is sent.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The active region has no token configured.
    #[error("no token configured for the active region")]
    MissingToken,

    /// The form values are invalid.
    #[error("invalid form: {0}")]
    Validation(#[from] DomainError),

    /// A previous submission has not settled yet.
    #[error("a submission is already in progress")]
    Busy,
}

/// Releases the busy flag when the submission settles, however it ends.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Use case for submitting one generation form.
///
/// One instance backs one form: it allows a single outstanding request and
/// keeps the latest [`SubmissionState`] for display.
pub struct SubmitGeneration<T, S, C> {
    transport: T,
    history: Arc<HistoryStore<S, C>>,
    busy: AtomicBool,
    state: Mutex<SubmissionState>,
}

impl<T, S, C> SubmitGeneration<T, S, C>
where
    T: GenerationTransport,
    S: KeyValueStore,
    C: Clock,
{
    /// Creates a new `SubmitGeneration` use case.
    #[must_use]
    pub fn new(transport: T, history: Arc<HistoryStore<S, C>>) -> Self {
        Self {
            transport,
            history,
            busy: AtomicBool::new(false),
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    /// Returns true while a submission is in flight.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Returns the latest submission state.
    #[must_use]
    pub fn state(&self) -> SubmissionState {
        self.lock_state().clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, SubmissionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: SubmissionState) {
        *self.lock_state() = state;
    }

    /// Sends the form and records the outcome.
    ///
    /// Remote and transport failures are not errors of this call: they end
    /// in [`SubmissionState::Error`]. A successful answer carrying result
    /// URLs is appended to the history.
    ///
    /// # Errors
    /// - [`SubmitError::Busy`] if another submission is in flight
    /// - [`SubmitError::MissingToken`] if the configuration has no token
    /// - [`SubmitError::Validation`] if the form is invalid
    pub async fn execute(
        &self,
        config: &EnvConfig,
        form: &GenerationForm,
    ) -> Result<SubmissionState, SubmitError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(SubmitError::Busy);
        }
        let _guard = BusyGuard(&self.busy);

        if !config.has_token() {
            return Err(SubmitError::MissingToken);
        }
        form.validate()?;

        self.set_state(SubmissionState::loading());
        let request = build_generation_request(config, form);
        debug!(method = %request.method, url = %request.url, "sending generation request");

        let state = match self.transport.send(&request).await {
            Ok(response) if response.is_success() => {
                let kind = form.kind();
                let urls = extract_result_urls(kind, &response.body);
                let history_id = if urls.is_empty() {
                    None
                } else {
                    let item = NewHistoryItem::new(
                        kind,
                        form.prompt(),
                        form.params_snapshot(),
                        urls,
                    );
                    Some(self.history.append(item).id)
                };
                info!(%kind, results = history_id.is_some(), "generation succeeded");
                SubmissionState::success(response.body, history_id)
            }
            Ok(response) => {
                warn!(status = response.status, "generation rejected by server");
                SubmissionState::remote_error(response.body)
            }
            Err(e) => {
                warn!(error = %e, "generation request failed");
                SubmissionState::transport_error(e.to_string())
            }
        };

        self.set_state(state.clone());
        Ok(state)
    }
}
