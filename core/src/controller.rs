use crate::client::StudioClient;
use crate::config::StudioConfig;
use crate::form::{FormSource, RequestBuildError};
use crate::notice::{self, Notice};
use crate::render::{render_response, FileProgress, RenderedResult};
use crate::request::build_request;
use crate::selection::{render_selection, validate_selection, SelectedFile, SelectionReport, SizePolicy};
use crate::state::{transition, SubmissionEvent, SubmissionState};
use crate::view::View;
use log::{error, info, warn};
use serde::Serialize;

/// How one submit call ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    /// A cycle was already running; nothing happened.
    Ignored,
    /// Oversized files blocked the request before it was built.
    Rejected { oversized: Vec<String> },
    Completed(RenderedResult),
    ServiceError(Notice),
    TransportError(Notice),
    ContentDecodeError(Notice),
}

impl SubmissionOutcome {
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            SubmissionOutcome::ServiceError(notice)
            | SubmissionOutcome::TransportError(notice)
            | SubmissionOutcome::ContentDecodeError(notice) => Some(notice),
            _ => None,
        }
    }
}

/// Drives validate → build → send → decode → render for one batch at a time.
pub struct SubmissionController<V: View> {
    client: StudioClient,
    view: V,
    policy: SizePolicy,
    provider_marker: String,
    state: SubmissionState,
}

impl<V: View> SubmissionController<V> {
    pub fn new(client: StudioClient, view: V, config: &StudioConfig) -> Self {
        let mut controller = Self {
            client,
            view,
            policy: SizePolicy::new(config.upload.max_file_bytes),
            provider_marker: config.upload.provider_marker.clone(),
            state: SubmissionState::default(),
        };
        controller.view.apply_state(&controller.state);
        controller
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn policy(&self) -> SizePolicy {
        self.policy
    }

    fn dispatch(&mut self, event: SubmissionEvent) {
        self.state = transition(&self.state, event);
        self.view.apply_state(&self.state);
    }

    /// Re-validates and re-renders the selection list.
    pub fn on_selection_changed(&mut self, files: &[SelectedFile]) -> SelectionReport {
        let report = validate_selection(files, self.policy);
        render_selection(&mut self.view, &report);
        self.dispatch(SubmissionEvent::SelectionChanged(report.notice()));
        report
    }

    /// Runs one submission cycle.
    ///
    /// Every user-facing failure is an `Ok` outcome. `Err` is reserved for a
    /// form missing one of its controls, and the UI is unlocked before it is
    /// returned. Dropping the returned future mid-flight also unlocks it.
    pub async fn submit<S: FormSource + ?Sized>(
        &mut self,
        files: &[SelectedFile],
        form: &S,
    ) -> Result<SubmissionOutcome, RequestBuildError> {
        if !self.state.is_idle() {
            return Ok(SubmissionOutcome::Ignored);
        }

        let mut cycle = CycleGuard { controller: self };
        let outcome = cycle.controller.run_cycle(files, form).await;
        drop(cycle);
        outcome
    }

    async fn run_cycle<S: FormSource + ?Sized>(
        &mut self,
        files: &[SelectedFile],
        form: &S,
    ) -> Result<SubmissionOutcome, RequestBuildError> {
        self.dispatch(SubmissionEvent::Submit);
        let report = validate_selection(files, self.policy);
        if report.has_oversized() {
            let oversized = report.oversized_names();
            warn!("submission blocked by oversized files: {}", oversized.join(", "));
            self.dispatch(SubmissionEvent::ValidationFailed(notice::oversized_submission(
                &oversized,
                self.policy.max_bytes,
            )));
            return Ok(SubmissionOutcome::Rejected { oversized });
        }

        self.dispatch(SubmissionEvent::ValidationPassed);
        let request = match build_request(files, form) {
            Ok(request) => request,
            Err(err) => {
                error!("cannot build upload request: {}", err);
                self.dispatch(SubmissionEvent::Aborted);
                return Err(err);
            }
        };

        let started: Vec<FileProgress> = request
            .files
            .iter()
            .map(|file| FileProgress::started(file.name.clone()))
            .collect();
        self.view.render_progress(&started);

        info!("submitting {} file(s) for generation", request.files.len());
        let reply = match self.client.upload(request).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!("upload request failed: {}", err);
                let notice = notice::transport_error();
                self.dispatch(SubmissionEvent::TransportFailed(notice.clone()));
                return Ok(SubmissionOutcome::TransportError(notice));
            }
        };

        if !reply.status.is_success() {
            warn!(
                "upload rejected with HTTP {}: {}",
                reply.status,
                reply.body.error.as_deref().unwrap_or("<no message>")
            );
            let notice = notice::service_error(reply.body.error.as_deref(), &self.provider_marker);
            self.dispatch(SubmissionEvent::ServiceFailed(notice.clone()));
            return Ok(SubmissionOutcome::ServiceError(notice));
        }

        self.dispatch(SubmissionEvent::Responded);
        match render_response(&mut self.view, &reply.body) {
            Ok(rendered) => {
                info!(
                    "batch finished: {} processed, {} failed",
                    rendered.summary.processed, rendered.summary.failed
                );
                self.dispatch(SubmissionEvent::Rendered);
                Ok(SubmissionOutcome::Completed(rendered))
            }
            Err(err) => {
                warn!("generated content could not be decoded: {}", err);
                let notice = notice::content_decode_error();
                self.dispatch(SubmissionEvent::ContentDecodeFailed(notice.clone()));
                Ok(SubmissionOutcome::ContentDecodeError(notice))
            }
        }
    }
}

/// Settles the controller if a cycle ends before reaching a terminal event.
struct CycleGuard<'a, V: View> {
    controller: &'a mut SubmissionController<V>,
}

impl<V: View> Drop for CycleGuard<'_, V> {
    fn drop(&mut self) {
        if !self.controller.state.is_idle() {
            warn!(
                "submission dropped while {:?}; unlocking",
                self.controller.state.phase
            );
            self.controller.dispatch(SubmissionEvent::Aborted);
        }
    }
}
