//! Multipart form parsing helpers
//!
//! Collects one file part plus text fields from a multipart/form-data upload.

use std::collections::HashMap;

use axum::extract::Multipart;

use crate::error::ApiError;

/// Represents a file uploaded via multipart form
#[derive(Debug, Clone)]
pub struct FileField {
    /// File data bytes
    pub data: Vec<u8>,
    /// Content-Type from the multipart field (if provided)
    pub content_type: Option<String>,
    /// Original filename from the multipart field (if provided)
    pub file_name: Option<String>,
}

impl FileField {
    /// Browsers submit an unselected file input as an empty part with an
    /// empty filename.
    fn is_blank(&self) -> bool {
        self.data.is_empty() && self.file_name.as_deref().map_or(true, str::is_empty)
    }
}

/// Parsed multipart form fields
#[derive(Debug)]
pub struct MultipartFields {
    file_field: &'static str,
    file: Option<FileField>,
    /// Text fields indexed by name
    text_fields: HashMap<String, String>,
}

impl MultipartFields {
    /// Parse all fields from a multipart request
    ///
    /// The part named `file_field` is read as raw bytes when it carries a
    /// filename; a second such part is rejected. Other parts carrying a
    /// filename are skipped, everything else is read as text.
    pub async fn parse(
        multipart: &mut Multipart,
        file_field: &'static str,
    ) -> Result<Self, ApiError> {
        let mut file: Option<FileField> = None;
        let mut text_fields = HashMap::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to parse multipart: {}", e)))?
        {
            let name = field.name().unwrap_or("").to_string();

            if name == file_field && field.file_name().is_some() {
                let content_type = field.content_type().map(|s| s.to_string());
                let file_name = field.file_name().map(|s| s.to_string());

                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Failed to read file: {}", e)))?
                    .to_vec();

                let parsed = FileField {
                    data,
                    content_type,
                    file_name,
                };
                if parsed.is_blank() {
                    tracing::debug!(field = file_field, "Ignoring blank file part");
                    continue;
                }
                if file.is_some() {
                    return Err(ApiError::bad_request(format!(
                        "Only one file may be sent in the '{}' field.",
                        file_field
                    )));
                }
                file = Some(parsed);
            } else if field.file_name().is_some() {
                tracing::debug!(field = %name, "Ignoring unexpected file part");
            } else {
                let value = field.text().await.map_err(|e| {
                    ApiError::bad_request(format!("Failed to read field '{}': {}", name, e))
                })?;
                text_fields.insert(name, value);
            }
        }

        Ok(Self {
            file_field,
            file,
            text_fields,
        })
    }

    /// Take the file field (required)
    ///
    /// Returns an error if no file was uploaded.
    pub fn take_file(&mut self) -> Result<FileField, ApiError> {
        self.file.take().ok_or_else(|| {
            ApiError::bad_request(format!(
                "No file provided. Use '{}' field in multipart form.",
                self.file_field
            ))
        })
    }

    /// Get a text field value
    ///
    /// Returns `None` if the field is not present.
    pub fn get_text(&self, name: &str) -> Option<&str> {
        self.text_fields.get(name).map(|s| s.as_str())
    }
}
