use reqwest::multipart::{Form, Part};

use crate::form::{FormParameters, FormSource, RequestBuildError};
use crate::selection::{FileHandle, SelectedFile};

/// Repeating multipart field carrying the selected files.
pub const FILES_FIELD: &str = "files[]";

/// One submission's payload. Built fresh per submit and consumed by the send.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub files: Vec<SelectedFile>,
    pub params: FormParameters,
}

/// Callers must have rejected oversized files before calling this.
pub fn build_request<S: FormSource + ?Sized>(
    files: &[SelectedFile],
    source: &S,
) -> Result<UploadRequest, RequestBuildError> {
    let params = FormParameters::read(source)?;
    Ok(UploadRequest {
        files: files.to_vec(),
        params,
    })
}

impl UploadRequest {
    pub fn file_names(&self) -> Vec<String> {
        self.files.iter().map(|file| file.name.clone()).collect()
    }

    /// Converts into a multipart body: file parts first, then every parameter.
    pub async fn into_form(self) -> std::io::Result<Form> {
        let mut form = Form::new();

        for file in self.files {
            let bytes = match file.handle {
                FileHandle::Bytes(bytes) => bytes,
                FileHandle::Path(path) => tokio::fs::read(&path).await?,
            };
            form = form.part(FILES_FIELD, Part::bytes(bytes).file_name(file.name));
        }

        for (name, value) in self.params.iter() {
            form = form.text(name, value.to_string());
        }

        Ok(form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormField;
    use std::collections::HashMap;

    fn form_values() -> HashMap<String, String> {
        FormField::ALL
            .iter()
            .map(|field| (field.name().to_string(), String::new()))
            .collect()
    }

    #[test]
    fn build_keeps_selection_order() {
        let files = vec![
            SelectedFile::from_bytes("b.mp3", vec![1]),
            SelectedFile::from_bytes("a.mp4", vec![2]),
        ];
        let request = build_request(&files, &form_values()).unwrap();
        assert_eq!(request.file_names(), vec!["b.mp3", "a.mp4"]);
        assert_eq!(request.params.iter().count(), 9);
    }

    #[test]
    fn build_without_files_is_allowed() {
        let request = build_request(&[], &form_values()).unwrap();
        assert!(request.files.is_empty());
    }

    #[tokio::test]
    async fn unreadable_path_fails_form_conversion() {
        let dir = tempfile::tempdir().unwrap();
        let request = UploadRequest {
            files: vec![SelectedFile {
                name: "gone.mp4".into(),
                size_bytes: 10,
                handle: FileHandle::Path(dir.path().join("gone.mp4")),
            }],
            params: FormParameters::read(&form_values()).unwrap(),
        };

        assert!(request.into_form().await.is_err());
    }
}
