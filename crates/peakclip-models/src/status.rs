//! Job status derived from the Output Store.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::JobId;

pub const MESSAGE_COMPLETE: &str = "Processing complete";
pub const MESSAGE_PENDING: &str = "Still processing or no clips found.";

/// Human-readable message for a clip count.
pub fn status_message(count: usize) -> &'static str {
    if count > 0 {
        MESSAGE_COMPLETE
    } else {
        MESSAGE_PENDING
    }
}

/// Body returned by `GET /status/{job_id}`.
///
/// `finished` means "at least one clip is ready", not "the pipeline has
/// stopped". An unknown job id and a job that has not produced anything yet
/// look the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JobStatus {
    pub job_id: JobId,
    pub clips: Vec<String>,
    pub count: usize,
    pub message: String,
    pub finished: bool,
}

impl JobStatus {
    /// Build a status from the public URLs of the final clips found so far.
    pub fn from_clips(job_id: JobId, clips: Vec<String>) -> Self {
        let count = clips.len();
        Self {
            job_id,
            clips,
            count,
            message: status_message(count).to_string(),
            finished: count > 0,
        }
    }
}
