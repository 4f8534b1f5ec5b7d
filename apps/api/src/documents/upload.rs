//! Multipart form reading for resume uploads.

use axum::extract::Multipart;
use bytes::Bytes;
use tracing::warn;

use crate::documents::{extract_text, MediaType};
use crate::errors::AppError;

/// Multipart field carrying the document.
pub const FILE_FIELD: &str = "resume";
/// Multipart field carrying the optional job description.
pub const JOB_DESCRIPTION_FIELD: &str = "jobDescription";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn media_type(&self) -> MediaType {
        MediaType::detect(self.content_type.as_deref(), self.filename.as_deref())
    }

    /// Decodes the document off the async runtime; PDF parsing is CPU-bound.
    pub async fn extract_text(&self) -> Result<String, AppError> {
        let media_type = self.media_type();
        let bytes = self.bytes.clone();
        let text = tokio::task::spawn_blocking(move || extract_text(&bytes, media_type))
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))?
            .inspect_err(|e| warn!(?media_type, "Text extraction failed: {e}"))?;
        Ok(text)
    }
}

#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub job_description: String,
}

/// Reads the `resume` file part and `jobDescription` text part. Unknown
/// fields are ignored.
pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some(FILE_FIELD) => {
                let filename = field.file_name().map(String::from);
                let content_type = field.content_type().map(String::from);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
                form.file = Some(UploadedFile {
                    filename,
                    content_type,
                    bytes,
                });
            }
            Some(JOB_DESCRIPTION_FIELD) => {
                form.job_description = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(e.body_text()))?;
            }
            _ => {}
        }
    }

    Ok(form)
}
