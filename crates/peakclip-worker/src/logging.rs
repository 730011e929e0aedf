//! Per-job structured logging.
//!
//! Every event a job emits carries `job_id` and `operation` as fields, so one
//! job can be followed through the JSON log stream with a single filter.

use std::fmt::Display;
use std::path::Path;
use std::time::Duration;

use tracing::{error, info, warn, Span};

use peakclip_models::JobId;

/// Emits the lifecycle events of one pipeline run.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: JobId,
    operation: &'static str,
}

impl JobLogger {
    pub fn new(job_id: &JobId, operation: &'static str) -> Self {
        Self {
            job_id: job_id.clone(),
            operation,
        }
    }

    /// The runner picked the job up.
    pub fn started(&self, source: &str) {
        info!(
            job_id = %self.job_id,
            operation = self.operation,
            source,
            "Job started"
        );
    }

    /// A stage finished; `detail` is a short human summary of its output.
    pub fn stage_done(&self, stage: &str, detail: &str) {
        info!(
            job_id = %self.job_id,
            operation = self.operation,
            stage,
            "Stage done: {}", detail
        );
    }

    pub fn clip_rendered(&self, index: usize, total: usize) {
        info!(
            job_id = %self.job_id,
            operation = self.operation,
            clip = index,
            total,
            "Clip rendered"
        );
    }

    /// A transient file or directory could not be removed. The job carries on.
    pub fn cleanup_failed(&self, path: &Path, error: &dyn Display) {
        warn!(
            job_id = %self.job_id,
            operation = self.operation,
            path = %path.display(),
            error = %error,
            "Job cleanup failed"
        );
    }

    /// The job stopped at `stage`. Clips rendered before it stay published.
    pub fn failed(&self, stage: &str, error: &dyn Display) {
        error!(
            job_id = %self.job_id,
            operation = self.operation,
            stage,
            error = %error,
            "Job failed"
        );
    }

    pub fn finished(&self, clips: usize, elapsed: Duration) {
        info!(
            job_id = %self.job_id,
            operation = self.operation,
            clips,
            elapsed_secs = elapsed.as_secs_f64(),
            "Job finished"
        );
    }

    pub fn job_id(&self) -> &JobId {
        &self.job_id
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Span the job's background task is instrumented with.
    pub fn span(&self) -> Span {
        tracing::info_span!("job", job_id = %self.job_id, operation = self.operation)
    }
}
