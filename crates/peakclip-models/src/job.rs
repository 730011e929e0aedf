//! Job identity and submission payloads.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Status reported for every freshly accepted submission.
pub const PROCESSING: &str = "processing";

/// Unique identifier for a job.
///
/// Minted once per submission and never reused. The id is also the
/// namespace of every artifact the job writes, so it must never begin with
/// the temp marker; a hyphenated UUID satisfies that.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Rejection reasons for a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Video URL is required")]
    MissingSource,
}

/// Body of `POST /process`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ProcessRequest {
    /// Locator of the source video.
    #[serde(default)]
    pub url: Option<String>,
}

impl ProcessRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
        }
    }

    /// Validate the request and return the source reference.
    pub fn validate(&self) -> Result<&str, SubmissionError> {
        match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(SubmissionError::MissingSource),
        }
    }
}

/// Body returned by `POST /process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ProcessResponse {
    pub job_id: JobId,
    pub status: String,
}

impl ProcessResponse {
    pub fn processing(job_id: JobId) -> Self {
        Self {
            job_id,
            status: PROCESSING.to_string(),
        }
    }
}
