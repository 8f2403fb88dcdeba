use reqwest::{Client, StatusCode, Url};
use std::collections::HashMap;
use thiserror::Error;

use crate::config::StudioConfig;
use crate::request::UploadRequest;
use crate::response::UploadResponseBody;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base url `{url}`: {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("failed to read selected file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("response body is not valid JSON: {0}")]
    Body(String),
}

#[derive(Debug, Error)]
pub enum TranslationFetchError {
    #[error("`{0}` is not a usable locale code")]
    InvalidLocale(String),
    #[error("translations for `{locale}` returned HTTP {status}")]
    Status { locale: String, status: StatusCode },
    #[error("failed to fetch translations: {0}")]
    Transport(#[from] reqwest::Error),
}

/// A reply that reached us with a status, success or not.
#[derive(Debug, Clone)]
pub struct ServiceReply {
    pub status: StatusCode,
    pub body: UploadResponseBody,
}

/// HTTP access to the generation service and its static assets.
#[derive(Debug, Clone)]
pub struct StudioClient {
    http: Client,
    base_url: Url,
    translations_path: String,
}

impl StudioClient {
    pub fn new(config: &StudioConfig) -> Result<Self, ClientError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.server.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Self::with_http(http, &config.server.base_url, &config.locale.translations_path)
    }

    pub fn with_http(
        http: Client,
        base_url: &str,
        translations_path: &str,
    ) -> Result<Self, ClientError> {
        // A trailing slash keeps `join` from dropping the last path segment.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let parsed = Url::parse(&normalized).map_err(|err| ClientError::BaseUrl {
            url: base_url.to_string(),
            reason: err.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::BaseUrl {
                url: base_url.to_string(),
                reason: "not a hierarchical url".into(),
            });
        }

        Ok(Self {
            http,
            base_url: parsed,
            translations_path: translations_path.trim_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ClientError::BaseUrl {
                url: self.base_url.to_string(),
                reason: err.to_string(),
            })
    }

    /// `POST /upload`. Any HTTP status is returned as a [`ServiceReply`].
    ///
    /// A non-success body that is not JSON is treated as empty so the caller
    /// can fall back to its generic message.
    pub async fn upload(&self, request: UploadRequest) -> Result<ServiceReply, ClientError> {
        let url = self.endpoint("upload")?;
        let form = request.into_form().await?;
        let response = self.http.post(url).multipart(form).send().await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let body = match serde_json::from_slice::<UploadResponseBody>(&bytes) {
            Ok(body) => body,
            Err(err) if status.is_success() => return Err(ClientError::Body(err.to_string())),
            Err(err) => {
                log::debug!("non-JSON error body from upload (HTTP {}): {}", status, err);
                UploadResponseBody::default()
            }
        };

        Ok(ServiceReply { status, body })
    }

    pub async fn fetch_translations(
        &self,
        locale: &str,
    ) -> Result<HashMap<String, String>, TranslationFetchError> {
        let well_formed = !locale.is_empty()
            && locale
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');
        if !well_formed {
            return Err(TranslationFetchError::InvalidLocale(locale.to_string()));
        }

        let path = format!("{}/{}.json", self.translations_path, locale);
        let url = self
            .base_url
            .join(&path)
            .map_err(|_| TranslationFetchError::InvalidLocale(locale.to_string()))?;

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(TranslationFetchError::Status {
                locale: locale.to_string(),
                status,
            });
        }

        Ok(response.json::<HashMap<String, String>>().await?)
    }
}
