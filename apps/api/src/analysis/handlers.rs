//! Axum route handlers for resume analysis and upload preview.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::analyze_resume;
use crate::documents::upload::read_upload_form;
use crate::errors::AppError;
use crate::models::report::AnalysisReport;
use crate::state::AppState;

/// Characters of extracted text echoed back by the preview endpoint.
const PREVIEW_CHARS: usize = 500;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPreviewResponse {
    pub message: String,
    pub filename: String,
    pub text_preview: String,
}

/// POST /api/analyze-resume
///
/// Multipart: `resume` (file), `jobDescription` (optional text).
/// Always answers with a complete report unless the input is unusable or
/// the provider is rate limiting.
pub async fn handle_analyze_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("analyze_resume", %request_id);

    async move {
        let form = read_upload_form(multipart).await?;
        let file = form
            .file
            .ok_or_else(|| AppError::Validation("No resume file uploaded".to_string()))?;
        info!(filename = ?file.filename, "Received resume upload");

        let resume_text = file.extract_text().await?;

        let report = analyze_resume(
            &resume_text,
            &form.job_description,
            state.completion.as_ref(),
            state.diagnostics.as_ref(),
        )
        .await?;

        Ok::<_, AppError>(Json(report))
    }
    .instrument(span)
    .await
}

/// POST /api/upload
///
/// Extracts text from the uploaded document and returns a short preview.
/// Diagnostic path only; no scoring happens here.
pub async fn handle_upload_preview(
    multipart: Multipart,
) -> Result<Json<UploadPreviewResponse>, AppError> {
    let form = read_upload_form(multipart).await?;
    let file = form
        .file
        .ok_or_else(|| AppError::Validation("No file uploaded".to_string()))?;

    let text = file.extract_text().await?;
    let filename = file.filename.clone().unwrap_or_default();
    info!("Extracted {} characters from {filename}", text.chars().count());

    Ok(Json(UploadPreviewResponse {
        message: "File processed successfully".to_string(),
        filename,
        text_preview: text.chars().take(PREVIEW_CHARS).collect(),
    }))
}
