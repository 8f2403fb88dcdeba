/// Configuration for the upload studio
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::selection::DEFAULT_MAX_FILE_BYTES;

const CONFIG_DIR_NAME: &str = "viral-studio";
const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerOptions {
    pub base_url: String,
    /// Transport-level timeout. The controller itself never times out a request.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".into(),
            request_timeout_secs: None,
        }
    }
}

impl ServerOptions {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOptions {
    pub max_file_bytes: u64,
    /// Substring that marks a service error as coming from the generation provider.
    pub provider_marker: String,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            provider_marker: "OpenAI".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleOptions {
    pub default_locale: String,
    pub translations_path: String,
    pub warning_dismiss_secs: u64,
}

impl Default for LocaleOptions {
    fn default() -> Self {
        Self {
            default_locale: "en".into(),
            translations_path: "/static/translations".into(),
            warning_dismiss_secs: 5,
        }
    }
}

impl LocaleOptions {
    pub fn warning_dismiss_delay(&self) -> Duration {
        Duration::from_secs(self.warning_dismiss_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiOptions {
    pub submit_label: String,
    pub busy_label: String,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            submit_label: "Generate Content".into(),
            busy_label: "Processing...".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudioConfig {
    #[serde(default)]
    pub server: ServerOptions,
    #[serde(default)]
    pub upload: UploadOptions,
    #[serde(default)]
    pub locale: LocaleOptions,
    #[serde(default)]
    pub ui: UiOptions,
}

impl StudioConfig {
    /// Platform config location, e.g. `~/.config/viral-studio/config.yaml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads the file at [`StudioConfig::default_path`], or defaults when it is missing.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!(
                    "ignoring unreadable config {}: {}",
                    path.to_string_lossy(),
                    err
                );
                Self::default()
            }
        }
    }

    /// Load configuration from a JSON or YAML file, picked by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = StudioConfig::default();
        assert_eq!(config.upload.max_file_bytes, 33_554_432);
        assert_eq!(config.locale.default_locale, "en");
        assert_eq!(config.locale.warning_dismiss_delay(), Duration::from_secs(5));
        assert!(config.server.request_timeout().is_none());
    }

    #[test]
    fn test_json_roundtrip_keeps_sections() {
        let mut config = StudioConfig::default();
        config.server.base_url = "http://studio.local".into();
        let json = config.to_json().unwrap();
        assert!(json.contains("baseUrl"));

        let parsed = StudioConfig::from_json(&json).unwrap();
        assert_eq!(parsed.server.base_url, "http://studio.local");
    }

    #[test]
    fn test_partial_yaml_falls_back_to_defaults() {
        let yaml = r#"
upload:
  maxFileBytes: 1024
  providerMarker: Gemini
"#;
        let config = StudioConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.upload.max_file_bytes, 1024);
        assert_eq!(config.upload.provider_marker, "Gemini");
        assert_eq!(config.ui.busy_label, "Processing...");
        assert_eq!(config.locale.translations_path, "/static/translations");
    }

    #[test]
    fn test_from_file_picks_format_by_extension() {
        let mut json_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(json_file, r#"{{"server": {{"baseUrl": "http://json.local", "requestTimeoutSecs": 30}}}}"#).unwrap();
        let config = StudioConfig::from_file(json_file.path()).unwrap();
        assert_eq!(config.server.base_url, "http://json.local");
        assert_eq!(config.server.request_timeout(), Some(Duration::from_secs(30)));

        let mut yaml_file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(yaml_file, "ui:\n  submitLabel: Go\n  busyLabel: Wait").unwrap();
        let config = StudioConfig::from_file(yaml_file.path()).unwrap();
        assert_eq!(config.ui.submit_label, "Go");
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = StudioConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }
}
