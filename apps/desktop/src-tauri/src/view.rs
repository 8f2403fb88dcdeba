use std::sync::{Arc, Mutex};

use log::warn;
use serde::Serialize;
use tauri::{AppHandle, Emitter};
use viral_studio_core::{
    BatchSummary, ContentPanel, ElementUpdate, FileLinks, FileProgress, Notice, SelectionEntry,
    SubmissionState, TaggedElement, UiOptions, View,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct StateEventPayload<'a> {
    #[serde(flatten)]
    state: &'a SubmissionState,
    submit_label: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct SelectionEventPayload<'a> {
    visible: bool,
    entries: &'a [SelectionEntry],
}

/// Forwards every render call to the webview as an event.
#[derive(Clone)]
pub struct TauriView {
    app: AppHandle,
    ui: UiOptions,
    tagged: Arc<Mutex<Vec<TaggedElement>>>,
}

impl TauriView {
    pub fn new(app: AppHandle, ui: UiOptions) -> Self {
        Self {
            app,
            ui,
            tagged: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replaces the elements the page reported as carrying translation keys.
    pub fn register_tagged_elements(&self, elements: Vec<TaggedElement>) {
        let mut guard = self
            .tagged
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = elements;
    }

    fn emit<S: Serialize + Clone>(&self, event: &str, payload: S) {
        if let Err(error) = self.app.emit(event, payload) {
            warn!("failed to emit {}: {}", event, error);
        }
    }
}

impl View for TauriView {
    fn apply_state(&mut self, state: &SubmissionState) {
        let submit_label = if state.submit_busy {
            self.ui.busy_label.as_str()
        } else {
            self.ui.submit_label.as_str()
        };
        self.emit(
            "studio:state",
            StateEventPayload {
                state,
                submit_label,
            },
        );
    }

    fn render_selection(&mut self, entries: &[SelectionEntry]) {
        self.emit(
            "studio:selection",
            SelectionEventPayload {
                visible: true,
                entries,
            },
        );
    }

    fn hide_selection(&mut self) {
        self.emit(
            "studio:selection",
            SelectionEventPayload {
                visible: false,
                entries: &[],
            },
        );
    }

    fn render_progress(&mut self, progress: &[FileProgress]) {
        self.emit("studio:progress", progress);
    }

    fn render_summary(&mut self, summary: &BatchSummary) {
        self.emit("studio:summary", summary);
    }

    fn render_content(&mut self, panel: &ContentPanel) {
        self.emit("studio:content", panel);
    }

    fn render_links(&mut self, links: &[FileLinks]) {
        self.emit("studio:links", links);
    }

    fn show_banner(&mut self, notice: &Notice) {
        self.emit("studio:banner", notice);
    }

    fn dismiss_banner(&mut self, notice_id: &str) {
        self.emit("studio:banner-dismissed", notice_id);
    }

    fn tagged_elements(&self) -> Vec<TaggedElement> {
        self.tagged
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }

    fn apply_translations(&mut self, updates: &[ElementUpdate]) {
        self.emit("studio:translations", updates);
    }
}
