//! Submission lifecycle as a value object.
//!
//! [`transition`] is the only way the controller changes UI lockout flags; the
//! resulting state is handed to [`crate::view::View::apply_state`] in one pass.

use serde::Serialize;

use crate::notice::Notice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Validating,
    Submitting,
    Rendering,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionState {
    pub phase: Phase,
    pub submit_enabled: bool,
    /// Submit control shows the busy label instead of its ready label.
    pub submit_busy: bool,
    pub result_visible: bool,
    pub progress_visible: bool,
    pub notice: Option<Notice>,
}

impl Default for SubmissionState {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            submit_enabled: true,
            submit_busy: false,
            result_visible: false,
            progress_visible: false,
            notice: None,
        }
    }
}

impl SubmissionState {
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Ready for another cycle: idle, enabled, ready label.
    fn settled(&self) -> Self {
        Self {
            phase: Phase::Idle,
            submit_enabled: true,
            submit_busy: false,
            progress_visible: false,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    /// Selection changed while idle; `None` clears the current notice.
    SelectionChanged(Option<Notice>),
    Submit,
    ValidationFailed(Notice),
    ValidationPassed,
    Responded,
    ServiceFailed(Notice),
    TransportFailed(Notice),
    Rendered,
    ContentDecodeFailed(Notice),
    /// The cycle ended without a result: the request could not be built or
    /// the caller dropped the submission. No notice is shown.
    Aborted,
}

pub fn transition(state: &SubmissionState, event: SubmissionEvent) -> SubmissionState {
    use Phase::*;
    use SubmissionEvent as E;

    match (state.phase, event) {
        (Idle, E::SelectionChanged(notice)) => SubmissionState {
            notice,
            ..state.clone()
        },
        (Idle, E::Submit) => SubmissionState {
            phase: Validating,
            ..state.clone()
        },
        (Validating, E::ValidationFailed(notice)) => SubmissionState {
            notice: Some(notice),
            ..state.settled()
        },
        (Validating, E::ValidationPassed) => SubmissionState {
            phase: Submitting,
            submit_enabled: false,
            submit_busy: true,
            result_visible: false,
            progress_visible: true,
            notice: None,
        },
        (Submitting, E::Responded) => SubmissionState {
            phase: Rendering,
            ..state.clone()
        },
        (Submitting, E::ServiceFailed(notice)) | (Submitting, E::TransportFailed(notice)) => {
            SubmissionState {
                notice: Some(notice),
                ..state.settled()
            }
        }
        (Rendering, E::Rendered) => SubmissionState {
            result_visible: true,
            ..state.settled()
        },
        (Rendering, E::ContentDecodeFailed(notice)) => SubmissionState {
            result_visible: false,
            notice: Some(notice),
            ..state.settled()
        },
        (Validating | Submitting | Rendering, E::Aborted) => state.settled(),
        (phase, event) => {
            log::debug!("ignoring {:?} while {:?}", event, phase);
            state.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notice;

    fn run(events: Vec<SubmissionEvent>) -> SubmissionState {
        events
            .into_iter()
            .fold(SubmissionState::default(), |state, event| transition(&state, event))
    }

    fn submitting() -> SubmissionState {
        run(vec![SubmissionEvent::Submit, SubmissionEvent::ValidationPassed])
    }

    #[test]
    fn validating_keeps_control_enabled() {
        let state = run(vec![SubmissionEvent::Submit]);
        assert_eq!(state.phase, Phase::Validating);
        assert!(state.submit_enabled);
        assert!(!state.submit_busy);
    }

    #[test]
    fn validation_failure_returns_to_idle_with_notice() {
        let state = run(vec![
            SubmissionEvent::Submit,
            SubmissionEvent::ValidationFailed(notice::Notice::error("too big")),
        ]);
        assert!(state.is_idle());
        assert!(state.submit_enabled);
        assert_eq!(state.notice.as_ref().map(|n| n.message.as_str()), Some("too big"));
    }

    #[test]
    fn submitting_locks_the_ui() {
        let mut before = SubmissionState::default();
        before.result_visible = true;
        before.notice = Some(notice::transport_error());
        let validating = transition(&before, SubmissionEvent::Submit);
        let state = transition(&validating, SubmissionEvent::ValidationPassed);

        assert_eq!(state.phase, Phase::Submitting);
        assert!(!state.submit_enabled);
        assert!(state.submit_busy);
        assert!(!state.result_visible);
        assert!(state.progress_visible);
        assert!(state.notice.is_none());
    }

    #[test]
    fn every_terminal_path_restores_the_control() {
        let endings = vec![
            vec![SubmissionEvent::ServiceFailed(notice::service_error(None, "OpenAI"))],
            vec![SubmissionEvent::TransportFailed(notice::transport_error())],
            vec![SubmissionEvent::Responded, SubmissionEvent::Rendered],
            vec![
                SubmissionEvent::Responded,
                SubmissionEvent::ContentDecodeFailed(notice::content_decode_error()),
            ],
            vec![SubmissionEvent::Aborted],
            vec![SubmissionEvent::Responded, SubmissionEvent::Aborted],
        ];

        for ending in endings {
            let state = ending
                .into_iter()
                .fold(submitting(), |state, event| transition(&state, event));
            assert!(state.is_idle());
            assert!(state.submit_enabled);
            assert!(!state.submit_busy);
            assert!(!state.progress_visible);
        }
    }

    #[test]
    fn success_reveals_result() {
        let state = run(vec![
            SubmissionEvent::Submit,
            SubmissionEvent::ValidationPassed,
            SubmissionEvent::Responded,
            SubmissionEvent::Rendered,
        ]);
        assert!(state.result_visible);
        assert!(state.notice.is_none());
    }

    #[test]
    fn decode_failure_keeps_result_hidden() {
        let state = run(vec![
            SubmissionEvent::Submit,
            SubmissionEvent::ValidationPassed,
            SubmissionEvent::Responded,
            SubmissionEvent::ContentDecodeFailed(notice::content_decode_error()),
        ]);
        assert!(!state.result_visible);
        assert!(state.notice.as_ref().unwrap().is_api_error());
    }

    #[test]
    fn second_submit_while_busy_is_ignored() {
        let busy = submitting();
        assert_eq!(transition(&busy, SubmissionEvent::Submit), busy);

        let rendering = transition(&busy, SubmissionEvent::Responded);
        assert_eq!(transition(&rendering, SubmissionEvent::Submit), rendering);
    }

    #[test]
    fn selection_changes_only_apply_while_idle() {
        let flagged = transition(
            &SubmissionState::default(),
            SubmissionEvent::SelectionChanged(Some(notice::Notice::error("File x exceeds"))),
        );
        assert!(flagged.notice.is_some());
        let cleared = transition(&flagged, SubmissionEvent::SelectionChanged(None));
        assert!(cleared.notice.is_none());

        let busy = submitting();
        let unchanged = transition(
            &busy,
            SubmissionEvent::SelectionChanged(Some(notice::Notice::error("late"))),
        );
        assert_eq!(unchanged, busy);
    }

    #[test]
    fn new_notice_replaces_old_one() {
        let first = run(vec![
            SubmissionEvent::Submit,
            SubmissionEvent::ValidationFailed(notice::Notice::error("first")),
        ]);
        let second = [
            SubmissionEvent::Submit,
            SubmissionEvent::ValidationPassed,
            SubmissionEvent::TransportFailed(notice::transport_error()),
        ]
        .into_iter()
        .fold(first, |state, event| transition(&state, event));

        assert_eq!(
            second.notice.map(|n| n.message),
            Some(notice::TRANSPORT_FAILURE.to_string())
        );
    }
}
