//! Health check handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
    pub timestamp: String,
}

/// Liveness probe, served at `/` and `/health`.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "online".to_string(),
        message: "Backend is running!".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub output_dir: String,
}

/// Readiness probe: the output directory exists or can be created.
pub async fn ready(State(state): State<AppState>) -> ApiResult<Json<ReadinessResponse>> {
    state
        .store()
        .ensure_dir()
        .await
        .map_err(|e| ApiError::internal(e, &state.config))?;

    Ok(Json(ReadinessResponse {
        status: "ready".to_string(),
        output_dir: state.store().root().display().to_string(),
    }))
}
