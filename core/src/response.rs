use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentDecodeError {
    #[error("response carried no generated content")]
    Missing,
    #[error("generated content is not a JSON string")]
    NotAString,
    #[error("generated content is not valid JSON: {0}")]
    Invalid(#[from] serde_json::Error),
    #[error("generated content is not a JSON object")]
    NotAnObject,
}

/// Raw JSON body of `POST /upload`. Every member may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponseBody {
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default, deserialize_with = "lenient_files")]
    pub files: Vec<UploadResponseFile>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponseFile {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_name")]
    pub original_filename: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub processed_filename: Option<String>,
}

impl UploadResponseFile {
    /// False when generation for this file failed inside a successful batch.
    pub fn is_processed(&self) -> bool {
        self.processed_filename
            .as_deref()
            .map(|name| !name.is_empty())
            .unwrap_or(false)
    }
}

/// Content generated for a batch. Fields of the wrong shape decode as absent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GeneratedContent {
    #[serde(deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub hashtags: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_text")]
    pub target_audience: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub platform_tips: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub content_length: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub hooks: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    pub engagement_strategies: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_list")]
    pub emotional_triggers: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_text")]
    pub pacing_guide: Option<String>,
    #[serde(deserialize_with = "lenient_list")]
    pub effect_recommendations: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_number")]
    pub viral_potential_score: Option<f64>,
}

impl GeneratedContent {
    /// Second parsing step: the body's `content` member is itself JSON text.
    pub fn decode(content: Option<&Value>) -> Result<Self, ContentDecodeError> {
        let raw = match content {
            None | Some(Value::Null) => return Err(ContentDecodeError::Missing),
            Some(Value::String(raw)) => raw,
            Some(_) => return Err(ContentDecodeError::NotAString),
        };

        let value: Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(ContentDecodeError::NotAnObject);
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub processed: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_files(files: &[UploadResponseFile]) -> Self {
        let total = files.len();
        let processed = files.iter().filter(|file| file.is_processed()).count();
        Self {
            total,
            processed,
            failed: total - processed,
        }
    }
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn lenient_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_text(deserializer)?.unwrap_or_default())
}

fn lenient_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(text) => Some(text),
                    Value::Number(number) => Some(number.to_string()),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_files<'de, D>(deserializer: D) -> Result<Vec<UploadResponseFile>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(file) => Some(file),
                Err(err) => {
                    log::warn!("skipping malformed file entry in upload response: {}", err);
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    })
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "file id must be a string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn file(id: &str, processed: Option<&str>) -> UploadResponseFile {
        UploadResponseFile {
            id: id.into(),
            original_filename: format!("{id}.mp4"),
            processed_filename: processed.map(str::to_string),
        }
    }

    #[test]
    fn summary_counts_processed_files() {
        let files = vec![
            file("1", Some("1_out.mp4")),
            file("2", None),
            file("3", Some("3_out.mp4")),
        ];
        let summary = BatchSummary::from_files(&files);
        assert_eq!(
            summary,
            BatchSummary {
                total: 3,
                processed: 2,
                failed: 1
            }
        );
        assert_eq!(summary.processed + summary.failed, summary.total);
    }

    #[test]
    fn summary_of_empty_batch() {
        let summary = BatchSummary::from_files(&[]);
        assert_eq!((summary.total, summary.processed, summary.failed), (0, 0, 0));
    }

    #[test]
    fn empty_processed_filename_counts_as_failed() {
        let summary = BatchSummary::from_files(&[file("1", Some(""))]);
        assert_eq!(summary.failed, 1);
    }

    #[test]
    fn body_tolerates_missing_members() {
        let body: UploadResponseBody = serde_json::from_value(json!({})).unwrap();
        assert!(body.content.is_none());
        assert!(body.files.is_empty());
        assert!(body.error.is_none());

        let odd: UploadResponseBody =
            serde_json::from_value(json!({ "files": "nope", "error": 7 })).unwrap();
        assert!(odd.files.is_empty());
        assert_eq!(odd.error.as_deref(), Some("7"));
    }

    #[test]
    fn numeric_ids_become_strings() {
        let body: UploadResponseBody = serde_json::from_value(json!({
            "files": [{ "id": 12, "original_filename": "a.mp3", "processed_filename": "a_out.mp3" }]
        }))
        .unwrap();
        assert_eq!(body.files[0].id, "12");
        assert!(body.files[0].is_processed());
    }

    #[test]
    fn odd_file_members_still_count_toward_the_batch() {
        let body: UploadResponseBody = serde_json::from_value(json!({
            "files": [
                { "id": 1, "original_filename": "a.mp4", "processed_filename": "a_out.mp4" },
                { "id": 2, "original_filename": null },
                { "id": 3, "original_filename": "c.mp4", "processed_filename": false }
            ]
        }))
        .unwrap();

        assert_eq!(body.files.len(), 3);
        assert_eq!(body.files[1].original_filename, "");
        assert!(!body.files[2].is_processed());
        assert_eq!(
            BatchSummary::from_files(&body.files),
            BatchSummary {
                total: 3,
                processed: 1,
                failed: 2
            }
        );
    }

    #[test]
    fn entry_without_id_is_skipped() {
        let body: UploadResponseBody = serde_json::from_value(json!({
            "files": [{ "original_filename": "a.mp4" }, { "id": "9", "original_filename": "b.mp4" }]
        }))
        .unwrap();
        assert_eq!(body.files.len(), 1);
        assert_eq!(body.files[0].id, "9");
    }

    #[test]
    fn decodes_nested_content() {
        let raw = json!(r#"{"title":"T","hashtags":["a","b"],"viral_potential_score":8}"#);
        let content = GeneratedContent::decode(Some(&raw)).unwrap();
        assert_eq!(content.title.as_deref(), Some("T"));
        assert_eq!(content.hashtags, Some(vec!["a".to_string(), "b".to_string()]));
        assert_eq!(content.viral_potential_score, Some(8.0));
        assert!(content.description.is_none());
    }

    #[test]
    fn string_where_list_expected_is_absent() {
        let raw = json!(r##"{"hashtags":"#one #two","hooks":null}"##);
        let content = GeneratedContent::decode(Some(&raw)).unwrap();
        assert!(content.hashtags.is_none());
        assert!(content.hooks.is_none());
    }

    #[test]
    fn decode_failures_are_classified() {
        assert!(matches!(
            GeneratedContent::decode(None),
            Err(ContentDecodeError::Missing)
        ));
        assert!(matches!(
            GeneratedContent::decode(Some(&json!({ "title": "T" }))),
            Err(ContentDecodeError::NotAString)
        ));
        assert!(matches!(
            GeneratedContent::decode(Some(&json!("not json"))),
            Err(ContentDecodeError::Invalid(_))
        ));
        assert!(matches!(
            GeneratedContent::decode(Some(&json!("[1,2]"))),
            Err(ContentDecodeError::NotAnObject)
        ));
    }
}
