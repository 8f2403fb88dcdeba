use serde::{Deserialize, Serialize};

use crate::notice::Notice;
use crate::render::{ContentPanel, FileLinks, FileProgress};
use crate::response::BatchSummary;
use crate::selection::SelectionEntry;
use crate::state::SubmissionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Input,
    TextArea,
    Option,
    Other,
}

/// An element carrying a translation key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaggedElement {
    pub id: String,
    pub key: String,
    pub kind: ElementKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateTarget {
    Placeholder,
    Text,
}

impl From<ElementKind> for UpdateTarget {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Input | ElementKind::TextArea => UpdateTarget::Placeholder,
            ElementKind::Option | ElementKind::Other => UpdateTarget::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementUpdate {
    pub id: String,
    pub target: UpdateTarget,
    pub value: String,
}

/// The surface the controller draws on.
///
/// Implementations only display what they are given; every decision about
/// what is visible is made by the controller before these calls.
pub trait View {
    /// Reconciles lockout flags, panel visibility and the current notice.
    fn apply_state(&mut self, state: &SubmissionState);

    fn render_selection(&mut self, entries: &[SelectionEntry]);
    fn hide_selection(&mut self);

    fn render_progress(&mut self, progress: &[FileProgress]);
    fn render_summary(&mut self, summary: &BatchSummary);
    fn render_content(&mut self, panel: &ContentPanel);
    fn render_links(&mut self, links: &[FileLinks]);

    fn show_banner(&mut self, notice: &Notice);
    fn dismiss_banner(&mut self, notice_id: &str);

    fn tagged_elements(&self) -> Vec<TaggedElement>;
    fn apply_translations(&mut self, updates: &[ElementUpdate]);
}

/// An in-memory [`View`] for headless hosts and tests.
pub mod testing {
    use super::*;
    use std::sync::{Arc, Mutex, MutexGuard};

    #[derive(Debug, Clone, Default)]
    pub struct Recorded {
        pub states: Vec<SubmissionState>,
        pub selection: Option<Vec<SelectionEntry>>,
        pub selection_hidden: usize,
        pub progress: Option<Vec<FileProgress>>,
        pub summary: Option<BatchSummary>,
        pub content: Option<ContentPanel>,
        pub links: Option<Vec<FileLinks>>,
        pub banner: Option<Notice>,
        pub dismissed: Vec<String>,
        pub elements: Vec<TaggedElement>,
        pub element_values: Vec<ElementUpdate>,
    }

    impl Recorded {
        pub fn last_state(&self) -> Option<&SubmissionState> {
            self.states.last()
        }

        /// Latest value written to an element, if any.
        pub fn element_value(&self, id: &str) -> Option<&ElementUpdate> {
            self.element_values.iter().rev().find(|update| update.id == id)
        }
    }

    /// Clones share the same record.
    #[derive(Debug, Clone, Default)]
    pub struct RecordingView {
        inner: Arc<Mutex<Recorded>>,
    }

    impl RecordingView {
        pub fn with_elements(elements: Vec<TaggedElement>) -> Self {
            let view = Self::default();
            view.lock().elements = elements;
            view
        }

        pub fn snapshot(&self) -> Recorded {
            self.lock().clone()
        }

        fn lock(&self) -> MutexGuard<'_, Recorded> {
            // A panicking test thread must not hide the record from the others.
            self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    impl View for RecordingView {
        fn apply_state(&mut self, state: &SubmissionState) {
            self.lock().states.push(state.clone());
        }

        fn render_selection(&mut self, entries: &[SelectionEntry]) {
            self.lock().selection = Some(entries.to_vec());
        }

        fn hide_selection(&mut self) {
            let mut recorded = self.lock();
            recorded.selection = None;
            recorded.selection_hidden += 1;
        }

        fn render_progress(&mut self, progress: &[FileProgress]) {
            self.lock().progress = Some(progress.to_vec());
        }

        fn render_summary(&mut self, summary: &BatchSummary) {
            self.lock().summary = Some(*summary);
        }

        fn render_content(&mut self, panel: &ContentPanel) {
            self.lock().content = Some(panel.clone());
        }

        fn render_links(&mut self, links: &[FileLinks]) {
            self.lock().links = Some(links.to_vec());
        }

        fn show_banner(&mut self, notice: &Notice) {
            self.lock().banner = Some(notice.clone());
        }

        fn dismiss_banner(&mut self, notice_id: &str) {
            let mut recorded = self.lock();
            if recorded.banner.as_ref().map(|banner| banner.id.as_str()) == Some(notice_id) {
                recorded.banner = None;
            }
            recorded.dismissed.push(notice_id.to_string());
        }

        fn tagged_elements(&self) -> Vec<TaggedElement> {
            self.lock().elements.clone()
        }

        fn apply_translations(&mut self, updates: &[ElementUpdate]) {
            self.lock().element_values.extend_from_slice(updates);
        }
    }
}
