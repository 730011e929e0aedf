//! Job pipeline metrics.

use std::time::Duration;

use metrics::{counter, histogram};

pub mod names {
    pub const JOBS_SUBMITTED: &str = "peakclip_jobs_submitted_total";
    pub const JOBS_FINISHED: &str = "peakclip_jobs_finished_total";
    pub const JOBS_FAILED: &str = "peakclip_jobs_failed_total";
    pub const CLIPS_RENDERED: &str = "peakclip_clips_rendered_total";
    pub const STAGE_DURATION: &str = "peakclip_stage_duration_seconds";
    pub const JOB_DURATION: &str = "peakclip_job_duration_seconds";
}

pub fn record_job_submitted() {
    counter!(names::JOBS_SUBMITTED).increment(1);
}

pub fn record_job_finished(duration: Duration) {
    counter!(names::JOBS_FINISHED).increment(1);
    histogram!(names::JOB_DURATION).record(duration.as_secs_f64());
}

pub fn record_job_failed(stage: &'static str) {
    counter!(names::JOBS_FAILED, "stage" => stage).increment(1);
}

pub fn record_clip_rendered() {
    counter!(names::CLIPS_RENDERED).increment(1);
}

pub fn record_stage(stage: &'static str, duration: Duration) {
    histogram!(names::STAGE_DURATION, "stage" => stage).record(duration.as_secs_f64());
}
