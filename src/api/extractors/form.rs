//! Multipart form extractor for endpoints that accept an optional image.

use std::collections::HashMap;
use std::str::FromStr;

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
};

use crate::errors::{AppError, AppResult};

/// A file part of a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub bytes: Bytes,
}

/// Text fields and files of a multipart request, keyed by field name.
///
/// Empty text fields and empty file parts count as absent.
#[derive(Debug, Default)]
pub struct FormData {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl FormData {
    /// Trimmed, non-empty text value of `name`.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Owned text value of `name`, or a validation error "{label} is required".
    pub fn required(&self, name: &str, label: &str) -> AppResult<String> {
        self.text(name)
            .map(str::to_string)
            .ok_or_else(|| AppError::validation(format!("{} is required", label)))
    }

    /// Parse `name` when present, failing with "{label} must be a valid number".
    pub fn parse<T: FromStr>(&self, name: &str, label: &str) -> AppResult<Option<T>> {
        self.text(name)
            .map(|raw| {
                raw.parse::<T>()
                    .map_err(|_| AppError::validation(format!("{} must be a valid number", label)))
            })
            .transpose()
    }

    /// Remove and return the file sent under `name`.
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

#[async_trait]
impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        let mut form = FormData::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| AppError::bad_request(e.body_text()))?;
                    if !bytes.is_empty() {
                        form.files.insert(
                            name,
                            UploadedFile {
                                file_name: Some(file_name),
                                bytes,
                            },
                        );
                    }
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| AppError::bad_request(e.body_text()))?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }
}
