use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

pub const GENERIC_UPLOAD_FAILURE: &str = "Upload failed. Please try again.";
pub const TRANSPORT_FAILURE: &str = "An error occurred while processing your request.";
pub const CONTENT_DECODE_FAILURE: &str = "An error occurred while processing the generated content.";
pub const TRANSLATIONS_UNAVAILABLE: &str =
    "Failed to load translations. Some text may appear in English.";

/// Visual treatment of a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Error,
    /// Failure attributed to the upstream generation provider.
    ApiError,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub id: String,
    pub kind: NoticeKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dismiss_after_ms: Option<u64>,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            message: message.into(),
            dismiss_after_ms: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message)
    }

    pub fn api_error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::ApiError, message)
    }

    pub fn warning(message: impl Into<String>, dismiss_after: Duration) -> Self {
        let mut notice = Self::new(NoticeKind::Warning, message);
        notice.dismiss_after_ms = Some(u64::try_from(dismiss_after.as_millis()).unwrap_or(u64::MAX));
        notice
    }

    pub fn dismiss_after(&self) -> Option<Duration> {
        self.dismiss_after_ms.map(Duration::from_millis)
    }

    pub fn is_api_error(&self) -> bool {
        self.kind == NoticeKind::ApiError
    }
}

/// Builds the notice for a non-success HTTP reply.
///
/// The service message is kept verbatim. It is classed as an API error when it
/// names the generation provider.
pub fn service_error(message: Option<&str>, provider_marker: &str) -> Notice {
    let message = message.map(str::trim).filter(|text| !text.is_empty());
    match message {
        Some(text) if names_provider(text, provider_marker) => Notice::api_error(text),
        Some(text) => Notice::error(text),
        None => Notice::error(GENERIC_UPLOAD_FAILURE),
    }
}

fn names_provider(message: &str, provider_marker: &str) -> bool {
    !provider_marker.is_empty() && message.contains(provider_marker)
}

pub fn transport_error() -> Notice {
    Notice::error(TRANSPORT_FAILURE)
}

pub fn content_decode_error() -> Notice {
    Notice::api_error(CONTENT_DECODE_FAILURE)
}

/// Aggregate error for a submission blocked by oversized files.
pub fn oversized_submission(names: &[String], max_bytes: u64) -> Notice {
    Notice::error(format!(
        "The following files exceed the {} limit: {}",
        crate::selection::format_size(max_bytes),
        names.join(", ")
    ))
}

/// Non-fatal notice raised while the selection is being edited.
pub fn oversized_selection(names: &[String], max_bytes: u64) -> Notice {
    let limit = crate::selection::format_size(max_bytes);
    if let [single] = names {
        Notice::error(format!("File {single} exceeds the {limit} size limit"))
    } else {
        Notice::error(format!("Files {} exceed the {limit} size limit", names.join(", ")))
    }
}
