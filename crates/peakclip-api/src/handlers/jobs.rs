//! Job submission and status handlers.

use axum::extract::{Path, State};
use axum::Json;
use tracing::info;

use peakclip_models::{JobId, JobStatus, ProcessRequest, ProcessResponse};

use crate::error::ApiResult;
use crate::state::AppState;

/// `POST /process`: schedule a job and return its id immediately.
pub async fn process_video(
    State(state): State<AppState>,
    Json(request): Json<ProcessRequest>,
) -> ApiResult<Json<ProcessResponse>> {
    let job_id = state.dispatcher.submit(&request)?;
    info!(job_id = %job_id, "Processing started");

    Ok(Json(ProcessResponse::processing(job_id)))
}

/// `GET /status/{job_id}`: report the clips rendered so far.
///
/// Unknown ids are not an error; they report zero clips.
pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Json<JobStatus> {
    Json(state.resolver.query(&JobId::from_string(job_id)).await)
}
