use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::llm_client::MODEL;
use crate::state::AppState;

/// GET /api/health
/// Returns a simple status object naming the completion model.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "Resume Reviewer API - AI-enhanced Version",
        "model": MODEL
    }))
}

/// GET /api/models
/// Passes through the provider's model listing.
pub async fn models_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let models = state
        .completion
        .list_models()
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;
    Ok(Json(models))
}
