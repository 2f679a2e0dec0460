use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::AppState;

pub const ROOT_MESSAGE: &str =
    "Lab Report OCR API is running. Use the /docs endpoint for API documentation.";

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health_check))
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RootMessage {
    pub message: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub ocr_engine: String,
    pub ocr_available: bool,
    /// Number of boilerplate patterns the line classifier applies
    pub ignore_patterns: usize,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "API is running", body = RootMessage)
    )
)]
pub async fn root() -> Json<RootMessage> {
    Json(RootMessage {
        message: ROOT_MESSAGE.to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health and OCR engine in use", body = HealthStatus)
    )
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "ok".to_string(),
        ocr_engine: state.recognizer.engine_name().to_string(),
        ocr_available: state.recognizer.is_available(),
        ignore_patterns: state.parser.classifier().pattern_count(),
    })
}
