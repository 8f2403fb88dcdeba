use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::notice::{self, Notice};
use crate::view::View;

/// 32 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 32 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileHandle {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

/// A file picked by the user. Read-only to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub size_bytes: u64,
    pub handle: FileHandle,
}

impl SelectedFile {
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            size_bytes: bytes.len() as u64,
            handle: FileHandle::Bytes(bytes),
        }
    }

    /// Describes a file on disk without reading its contents.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        Ok(Self {
            name,
            size_bytes: metadata.len(),
            handle: FileHandle::Path(path.to_path_buf()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizePolicy {
    pub max_bytes: u64,
}

impl Default for SizePolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

impl SizePolicy {
    pub const fn new(max_bytes: u64) -> Self {
        Self { max_bytes }
    }

    /// A file exactly at the limit is accepted.
    pub const fn exceeds(&self, size_bytes: u64) -> bool {
        size_bytes > self.max_bytes
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionEntry {
    pub name: String,
    pub size_bytes: u64,
    pub size_label: String,
    pub oversized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionReport {
    pub entries: Vec<SelectionEntry>,
    pub max_bytes: u64,
}

impl SelectionReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_oversized(&self) -> bool {
        self.entries.iter().any(|entry| entry.oversized)
    }

    pub fn oversized_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|entry| entry.oversized)
            .map(|entry| entry.name.clone())
            .collect()
    }

    /// Non-fatal notice naming the oversized files, if any.
    pub fn notice(&self) -> Option<Notice> {
        let names = self.oversized_names();
        if names.is_empty() {
            None
        } else {
            Some(notice::oversized_selection(&names, self.max_bytes))
        }
    }
}

pub fn validate_selection(files: &[SelectedFile], policy: SizePolicy) -> SelectionReport {
    let entries = files
        .iter()
        .map(|file| SelectionEntry {
            name: file.name.clone(),
            size_bytes: file.size_bytes,
            size_label: format_size(file.size_bytes),
            oversized: policy.exceeds(file.size_bytes),
        })
        .collect();

    SelectionReport {
        entries,
        max_bytes: policy.max_bytes,
    }
}

/// Lists every entry; an empty selection hides the list.
pub fn render_selection<V: View + ?Sized>(view: &mut V, report: &SelectionReport) {
    if report.is_empty() {
        view.hide_selection();
    } else {
        view.render_selection(&report.entries);
    }
}

pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;

    if bytes >= MB {
        scaled(bytes, MB, "MB")
    } else if bytes >= KB {
        scaled(bytes, KB, "KB")
    } else {
        format!("{bytes} B")
    }
}

fn scaled(bytes: u64, unit: u64, suffix: &str) -> String {
    if bytes % unit == 0 {
        format!("{} {suffix}", bytes / unit)
    } else {
        format!("{:.1} {suffix}", bytes as f64 / unit as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::testing::RecordingView;

    fn sized(name: &str, size_bytes: u64) -> SelectedFile {
        SelectedFile {
            name: name.into(),
            size_bytes,
            handle: FileHandle::Bytes(Vec::new()),
        }
    }

    #[test]
    fn limit_is_inclusive() {
        let policy = SizePolicy::default();
        assert!(!policy.exceeds(33_554_432));
        assert!(policy.exceeds(33_554_433));
        assert!(!policy.exceeds(0));
    }

    #[test]
    fn flags_only_files_over_the_limit() {
        let files = vec![
            sized("small.mp3", 1_000),
            sized("edge.mp4", DEFAULT_MAX_FILE_BYTES),
            sized("huge.mp4", DEFAULT_MAX_FILE_BYTES + 1),
        ];
        let report = validate_selection(&files, SizePolicy::default());

        let flags: Vec<bool> = report.entries.iter().map(|entry| entry.oversized).collect();
        assert_eq!(flags, vec![false, false, true]);
        assert_eq!(report.oversized_names(), vec!["huge.mp4".to_string()]);

        let notice = report.notice().expect("oversized file produces a notice");
        assert!(notice.message.contains("huge.mp4"));
        assert!(!notice.message.contains("edge.mp4"));
    }

    #[test]
    fn valid_selection_has_no_notice() {
        let report = validate_selection(&[sized("a.mp3", 10)], SizePolicy::default());
        assert!(!report.has_oversized());
        assert!(report.notice().is_none());
    }

    #[test]
    fn empty_selection_hides_list() {
        let mut view = RecordingView::default();
        let report = validate_selection(&[], SizePolicy::default());
        render_selection(&mut view, &report);

        let recorded = view.snapshot();
        assert!(recorded.selection.is_none());
        assert_eq!(recorded.selection_hidden, 1);
    }

    #[test]
    fn renders_valid_and_invalid_entries_together() {
        let mut view = RecordingView::default();
        let files = vec![sized("ok.mp3", 5), sized("big.mp4", u64::MAX)];
        render_selection(&mut view, &validate_selection(&files, SizePolicy::default()));

        let listed = view.snapshot().selection.expect("list rendered");
        assert_eq!(listed.len(), 2);
        assert!(!listed[0].oversized);
        assert!(listed[1].oversized);
    }

    #[test]
    fn formats_sizes() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(DEFAULT_MAX_FILE_BYTES), "32 MB");
    }

    #[tokio::test]
    async fn from_path_reads_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, vec![0u8; 42]).unwrap();

        let file = SelectedFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "clip.mp4");
        assert_eq!(file.size_bytes, 42);
        assert_eq!(file.handle, FileHandle::Path(path));
    }
}
