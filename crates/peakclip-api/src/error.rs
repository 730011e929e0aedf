//! API error types.

use std::fmt::Display;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use peakclip_models::SubmissionError;

use crate::config::ApiConfig;

pub type ApiResult<T> = Result<T, ApiError>;

pub const INTERNAL_ERROR_DETAIL: &str = "An internal error occurred";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    /// Detail is already masked for the configured environment.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    /// Server-side failure. Production configs hide the cause from clients.
    pub fn internal(err: impl Display, config: &ApiConfig) -> Self {
        if config.is_production() {
            Self::Internal(INTERNAL_ERROR_DETAIL.to_string())
        } else {
            Self::Internal(format!("Internal error: {}", err))
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<SubmissionError> for ApiError {
    fn from(err: SubmissionError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.to_string();
        (status, Json(ErrorResponse { detail })).into_response()
    }
}
