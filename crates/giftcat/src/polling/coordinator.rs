use std::sync::Arc;

use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::catalog::{CatalogDraft, CatalogId, SessionInputs, StatusObservation};
use crate::error::PreconditionError;
use crate::reader::{ContentReader, StatusReader};
use crate::sanitize;
use crate::store::{self, DraftStore};

use super::host::{Destination, Navigator, Notifier, Sleeper};
use super::policy::PollPolicy;
use super::state::{transition, PollAction, PollEvent, PollState, TerminalReason};

/// How a polling session ended. The navigation has already been issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub reason: TerminalReason,
    pub destination: Destination,
    /// Status attempts made (0 when the session could not start).
    pub attempts: u32,
}

/// Drives one polling session from its inputs to exactly one navigation.
pub struct PollingCoordinator {
    status_reader: Arc<dyn StatusReader>,
    content_reader: Arc<dyn ContentReader>,
    store: Arc<dyn DraftStore>,
    sleeper: Arc<dyn Sleeper>,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
    policy: PollPolicy,
}

impl PollingCoordinator {
    pub fn new(
        status_reader: Arc<dyn StatusReader>,
        content_reader: Arc<dyn ContentReader>,
        store: Arc<dyn DraftStore>,
        sleeper: Arc<dyn Sleeper>,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            status_reader,
            content_reader,
            store,
            sleeper,
            navigator,
            notifier,
            policy: PollPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &PollPolicy {
        &self.policy
    }

    /// Resolves the session inputs from the `id` query parameter and the store,
    /// then runs the session.
    pub async fn run_from_query(&self, query_id: Option<&str>) -> SessionOutcome {
        let inputs = SessionInputs::resolve(query_id, self.store.as_ref());
        self.run(inputs).await
    }

    pub async fn run(&self, inputs: Result<SessionInputs, PreconditionError>) -> SessionOutcome {
        let session_id = uuid::Uuid::new_v4();
        let catalog_id = inputs
            .as_ref()
            .map(|i| i.catalog_id.to_string())
            .unwrap_or_default();
        let span = info_span!("polling_session", session_id = %session_id, catalog_id = %catalog_id);

        self.drive(inputs).instrument(span).await
    }

    async fn drive(&self, inputs: Result<SessionInputs, PreconditionError>) -> SessionOutcome {
        let (inputs, mut event) = match inputs {
            Ok(inputs) => {
                info!(
                    expected = inputs.expected_count.get(),
                    max_attempts = self.policy.max_attempts,
                    max_wait_ms = self.policy.total_wait().as_millis() as u64,
                    "Polling session started"
                );
                (Some(inputs), PollEvent::Started)
            }
            Err(e) => {
                warn!(error = %e, "Polling session cannot start");
                (None, PollEvent::PreconditionFailed)
            }
        };

        let mut state = PollState::Init;
        let mut attempts = 0;

        let reason = loop {
            let t = match transition(state, event, &self.policy) {
                Ok(t) => t,
                Err(e) => {
                    error!(error = %e, "Polling state machine rejected event");
                    break TerminalReason::TimedOut;
                }
            };
            debug!(from = ?state, to = ?t.next, "Polling state transition");
            state = t.next;

            event = match t.action {
                PollAction::FetchStatus { attempt } => {
                    let Some(inputs) = inputs.as_ref() else {
                        break TerminalReason::PreconditionFailed;
                    };
                    attempts = attempt;
                    self.poll_status(inputs, attempt).await
                }
                PollAction::Wait(interval) => {
                    self.sleeper.sleep(interval).await;
                    PollEvent::WaitElapsed
                }
                PollAction::FetchContent => {
                    let Some(inputs) = inputs.as_ref() else {
                        break TerminalReason::PreconditionFailed;
                    };
                    self.complete(inputs).await
                }
                PollAction::Finish(reason) => break reason,
            };
        };

        self.finish(reason, inputs.as_ref().map(|i| &i.catalog_id), attempts)
    }

    async fn poll_status(&self, inputs: &SessionInputs, attempt: u32) -> PollEvent {
        let record = match self.status_reader.read_status(&inputs.catalog_id).await {
            Ok(record) => record,
            Err(e) => {
                warn!(attempt, error = %e, "Status poll missed");
                return PollEvent::StatusUnavailable;
            }
        };

        match record.observe(inputs.expected_count) {
            StatusObservation::Complete => {
                info!(attempt, "All OGP items done");
                PollEvent::StatusComplete
            }
            StatusObservation::Incomplete { done, expected } => {
                info!(
                    attempt,
                    done,
                    expected,
                    total_done = record.total_done(),
                    recorded_count = record.recorded_count,
                    "OGP items still pending"
                );
                PollEvent::StatusIncomplete { done, expected }
            }
        }
    }

    async fn complete(&self, inputs: &SessionInputs) -> PollEvent {
        let content = match self.content_reader.read_content(&inputs.catalog_id).await {
            Ok(content) => content,
            Err(e) => {
                error!(error = %e, "Catalog content fetch failed");
                return PollEvent::ContentFailed;
            }
        };

        let draft = CatalogDraft::from_content(inputs.catalog_id.clone(), &content);
        for (index, slot) in draft.slots().iter().enumerate() {
            debug!(
                slot = index + 1,
                title = %slot.title,
                image = %sanitize::summarize_image_data(&slot.image_data),
                "Draft slot"
            );
        }

        match store::save_draft(self.store.as_ref(), &draft) {
            Ok(()) => {
                info!("Draft persisted");
                PollEvent::DraftPersisted
            }
            Err(e) => {
                error!(error = %e, "Failed to persist draft");
                PollEvent::ContentFailed
            }
        }
    }

    fn finish(
        &self,
        reason: TerminalReason,
        catalog_id: Option<&CatalogId>,
        attempts: u32,
    ) -> SessionOutcome {
        let destination = reason.destination(catalog_id);

        if let Some(notice) = reason.notice() {
            self.notifier.notify(notice);
        }

        info!(
            reason = %reason,
            destination = %destination,
            attempts,
            "Polling session finished"
        );
        self.navigator.navigate(&destination);

        SessionOutcome {
            reason,
            destination,
            attempts,
        }
    }
}
