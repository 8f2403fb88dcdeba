pub mod client;
pub mod config;
pub mod controller;
pub mod form;
pub mod i18n;
pub mod notice;
pub mod render;
pub mod request;
pub mod response;
pub mod selection;
pub mod state;
pub mod view;

pub use client::{ClientError, ServiceReply, StudioClient, TranslationFetchError};
pub use config::{ConfigError, LocaleOptions, ServerOptions, StudioConfig, UiOptions, UploadOptions};
pub use controller::{SubmissionController, SubmissionOutcome};
pub use form::{FormField, FormParameters, FormSource, RequestBuildError};
pub use i18n::{
    locale_attempts, schedule_dismissal, translation_updates, LocaleLoadOutcome,
    TranslationLoader, TranslationTable,
};
pub use notice::{Notice, NoticeKind};
pub use render::{
    render_response, ContentField, ContentPanel, FieldValue, FileLinks, FileProgress,
    RenderedField, RenderedResult,
};
pub use request::{build_request, UploadRequest, FILES_FIELD};
pub use response::{
    BatchSummary, ContentDecodeError, GeneratedContent, UploadResponseBody, UploadResponseFile,
};
pub use selection::{
    format_size, render_selection, validate_selection, FileHandle, SelectedFile, SelectionEntry,
    SelectionReport, SizePolicy, DEFAULT_MAX_FILE_BYTES,
};
pub use state::{transition, Phase, SubmissionEvent, SubmissionState};
pub use view::{ElementKind, ElementUpdate, TaggedElement, UpdateTarget, View};
