use serde::Serialize;

use crate::response::{
    BatchSummary, ContentDecodeError, GeneratedContent, UploadResponseBody, UploadResponseFile,
};
use crate::view::View;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileProgress {
    pub filename: String,
    pub percent: u8,
}

impl FileProgress {
    pub fn started(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            percent: 0,
        }
    }

    pub fn finished(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            percent: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileLinks {
    pub id: String,
    pub label: String,
    pub preview_url: String,
    /// Absent when generation failed for this file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl FileLinks {
    pub fn for_file(file: &UploadResponseFile) -> Self {
        Self {
            id: file.id.clone(),
            label: file.original_filename.clone(),
            preview_url: preview_url(&file.id),
            download_url: file.is_processed().then(|| download_url(&file.id)),
        }
    }
}

pub fn preview_url(id: &str) -> String {
    format!("/preview/{id}")
}

pub fn download_url(id: &str) -> String {
    format!("/download/{id}")
}

/// Fields of the content panel, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentField {
    Title,
    Description,
    Hashtags,
    TargetAudience,
    PlatformTips,
    ContentLength,
    Hooks,
    EngagementStrategies,
    EmotionalTriggers,
    PacingGuide,
    EffectRecommendations,
    ViralPotentialScore,
}

impl ContentField {
    pub const ALL: [ContentField; 12] = [
        ContentField::Title,
        ContentField::Description,
        ContentField::Hashtags,
        ContentField::TargetAudience,
        ContentField::PlatformTips,
        ContentField::ContentLength,
        ContentField::Hooks,
        ContentField::EngagementStrategies,
        ContentField::EmotionalTriggers,
        ContentField::PacingGuide,
        ContentField::EffectRecommendations,
        ContentField::ViralPotentialScore,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            ContentField::Title => "Title",
            ContentField::Description => "Description",
            ContentField::Hashtags => "Hashtags",
            ContentField::TargetAudience => "Target Audience",
            ContentField::PlatformTips => "Platform Tips",
            ContentField::ContentLength => "Content Length",
            ContentField::Hooks => "Hooks",
            ContentField::EngagementStrategies => "Engagement Strategies",
            ContentField::EmotionalTriggers => "Emotional Triggers",
            ContentField::PacingGuide => "Pacing Guide",
            ContentField::EffectRecommendations => "Effect Recommendations",
            ContentField::ViralPotentialScore => "Viral Potential Score",
        }
    }

    /// Text shown when the field is absent, empty or of the wrong shape.
    pub const fn placeholder(&self) -> &'static str {
        match self {
            ContentField::Title => "No title available",
            ContentField::Description => "No description available",
            ContentField::Hashtags => "No hashtags available",
            ContentField::TargetAudience => "No target audience available",
            ContentField::PlatformTips => "No platform tips available",
            ContentField::ContentLength => "No content length available",
            ContentField::Hooks => "No hooks available",
            ContentField::EngagementStrategies => "No engagement strategies available",
            ContentField::EmotionalTriggers => "No emotional triggers available",
            ContentField::PacingGuide => "No pacing guide available",
            ContentField::EffectRecommendations => "No effect recommendations available",
            ContentField::ViralPotentialScore => "No score available",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Text(String),
    Items(Vec<String>),
    Placeholder(String),
}

impl FieldValue {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, FieldValue::Placeholder(_))
    }

    pub fn display(&self) -> String {
        match self {
            FieldValue::Text(text) | FieldValue::Placeholder(text) => text.clone(),
            FieldValue::Items(items) => items.join("\n"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedField {
    pub field: ContentField,
    pub label: &'static str,
    pub value: FieldValue,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentPanel {
    pub fields: Vec<RenderedField>,
}

impl ContentPanel {
    pub fn from_content(content: &GeneratedContent) -> Self {
        let fields = ContentField::ALL
            .iter()
            .map(|field| RenderedField {
                field: *field,
                label: field.label(),
                value: field_value(*field, content),
            })
            .collect();
        Self { fields }
    }

    pub fn get(&self, field: ContentField) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|rendered| rendered.field == field)
            .map(|rendered| &rendered.value)
    }
}

fn field_value(field: ContentField, content: &GeneratedContent) -> FieldValue {
    let value = match field {
        ContentField::Title => text(&content.title),
        ContentField::Description => text(&content.description),
        ContentField::Hashtags => content
            .hashtags
            .as_ref()
            .map(|tags| non_empty_items(tags).join(" "))
            .filter(|joined| !joined.is_empty())
            .map(FieldValue::Text),
        ContentField::TargetAudience => text(&content.target_audience),
        ContentField::PlatformTips => text(&content.platform_tips),
        ContentField::ContentLength => text(&content.content_length),
        ContentField::Hooks => items(&content.hooks),
        ContentField::EngagementStrategies => items(&content.engagement_strategies),
        ContentField::EmotionalTriggers => items(&content.emotional_triggers),
        ContentField::PacingGuide => text(&content.pacing_guide),
        ContentField::EffectRecommendations => items(&content.effect_recommendations),
        ContentField::ViralPotentialScore => content
            .viral_potential_score
            .filter(|score| score.is_finite())
            .map(|score| FieldValue::Text(format!("{score}/10"))),
    };

    value.unwrap_or_else(|| FieldValue::Placeholder(field.placeholder().to_string()))
}

fn text(value: &Option<String>) -> Option<FieldValue> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| FieldValue::Text(text.to_string()))
}

fn items(value: &Option<Vec<String>>) -> Option<FieldValue> {
    value
        .as_ref()
        .map(|list| non_empty_items(list))
        .filter(|list| !list.is_empty())
        .map(FieldValue::Items)
}

fn non_empty_items(list: &[String]) -> Vec<String> {
    list.iter()
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Everything drawn for one successful response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedResult {
    pub summary: BatchSummary,
    pub progress: Vec<FileProgress>,
    pub panel: ContentPanel,
    pub links: Vec<FileLinks>,
}

/// Renders a success body.
///
/// Decoding happens first; when it fails nothing is drawn.
pub fn render_response<V: View + ?Sized>(
    view: &mut V,
    body: &UploadResponseBody,
) -> Result<RenderedResult, ContentDecodeError> {
    let content = GeneratedContent::decode(body.content.as_ref())?;

    let summary = BatchSummary::from_files(&body.files);
    view.render_summary(&summary);

    // Progress means "request finished", not "generation succeeded".
    let progress: Vec<FileProgress> = body
        .files
        .iter()
        .map(|file| FileProgress::finished(file.original_filename.clone()))
        .collect();
    view.render_progress(&progress);

    let panel = ContentPanel::from_content(&content);
    view.render_content(&panel);

    let links: Vec<FileLinks> = body.files.iter().map(FileLinks::for_file).collect();
    view.render_links(&links);

    Ok(RenderedResult {
        summary,
        progress,
        panel,
        links,
    })
}
