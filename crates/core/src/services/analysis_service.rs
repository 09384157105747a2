use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::analysis::{AnalysisReport, AnalysisRequest, AnalysisState};
use crate::models::instrument::Instrument;
use crate::models::settings::Language;
use crate::providers::traits::AnalysisProvider;

/// One in-flight analysis request, detached from the session.
///
/// Resolving a ticket doesn't borrow the session, so the caller can keep
/// handling input (or spawn the ticket) while it is pending.
pub struct AnalysisTicket {
    id: Uuid,
    request: AnalysisRequest,
    provider: Arc<dyn AnalysisProvider>,
    timeout: Duration,
}

impl std::fmt::Debug for AnalysisTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisTicket")
            .field("id", &self.id)
            .field("instrument", &self.request.instrument_id)
            .field("language", &self.request.language)
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl AnalysisTicket {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }

    /// Run the request under the timeout. Never fails: every error becomes
    /// an outcome with no report.
    pub async fn resolve(self) -> AnalysisOutcome {
        let result = match tokio::time::timeout(self.timeout, self.provider.analyze(&self.request)).await {
            Ok(result) => result,
            Err(_) => Err(CoreError::Timeout(self.timeout.as_secs())),
        };

        let report = match result {
            Ok(report) => Some(report),
            Err(e) => {
                tracing::warn!(
                    request_id = %self.id,
                    instrument = %self.request.instrument_id,
                    provider = self.provider.name(),
                    error = %e,
                    "analysis request failed"
                );
                None
            }
        };

        AnalysisOutcome {
            request_id: self.id,
            instrument_id: self.request.instrument_id,
            report,
        }
    }
}

/// Result of a resolved ticket, tagged with the request it answers.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub request_id: Uuid,
    pub instrument_id: String,
    pub report: Option<AnalysisReport>,
}

/// Analysis panel state machine.
///
/// Only the outcome of the most recently issued request is applied;
/// anything older is stale and dropped.
pub struct AnalysisController {
    provider: Arc<dyn AnalysisProvider>,
    timeout: Duration,
    state: AnalysisState,
}

impl AnalysisController {
    pub fn new(provider: Arc<dyn AnalysisProvider>, timeout: Duration) -> Self {
        Self {
            provider,
            timeout,
            state: AnalysisState::Idle,
        }
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Enter `Loading` for `instrument` and hand out the ticket that
    /// will answer it. Supersedes any request already in flight.
    pub fn begin(&mut self, instrument: &Instrument, language: Language) -> AnalysisTicket {
        let id = Uuid::new_v4();
        if let Some(previous) = self.state.pending_request() {
            tracing::debug!(%previous, superseded_by = %id, "analysis request superseded");
        }
        self.state = AnalysisState::Loading {
            request_id: id,
            instrument_id: instrument.id.clone(),
        };
        tracing::debug!(request_id = %id, instrument = %instrument.id, %language, "analysis requested");

        AnalysisTicket {
            id,
            request: AnalysisRequest::for_instrument(instrument, language),
            provider: Arc::clone(&self.provider),
            timeout: self.timeout,
        }
    }

    /// Fold an outcome back in. Returns `false` (and changes nothing) if
    /// the outcome doesn't answer the request currently loading.
    pub fn apply(&mut self, outcome: AnalysisOutcome) -> bool {
        if self.state.pending_request() != Some(outcome.request_id) {
            tracing::warn!(
                request_id = %outcome.request_id,
                instrument = %outcome.instrument_id,
                "discarding stale analysis result"
            );
            return false;
        }

        self.state = match outcome.report {
            Some(report) => AnalysisState::Ready {
                instrument_id: outcome.instrument_id,
                report,
            },
            None => AnalysisState::Idle,
        };
        true
    }

    /// Back to `Idle`, orphaning any request in flight.
    pub fn reset(&mut self) {
        self.state = AnalysisState::Idle;
    }
}
