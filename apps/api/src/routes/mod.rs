pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/models", get(health::models_handler))
        .route(
            "/api/analyze-resume",
            post(handlers::handle_analyze_resume),
        )
        .route("/api/upload", post(handlers::handle_upload_preview))
        .fallback_service(static_files)
        .layer(body_limit)
        .with_state(state)
}
