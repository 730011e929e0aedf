//! Clip pipeline worker.
//!
//! This crate provides:
//! - Collaborator traits for acquisition, detection, captioning and rendering
//! - Default collaborators backed by yt-dlp, FFmpeg and the caption service
//! - The job runner (acquire, detect, caption, render)
//! - The job dispatcher that schedules runners in the background
//! - Scoped cleanup of temp clips, unfinished clips and per-job download dirs

pub mod cleanup;
pub mod collaborators;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod runner;

pub use cleanup::{JobWorkspace, ScopedArtifact};
pub use collaborators::{
    CaptionBurner, Captioner, Collaborators, FfmpegCaptionBurner, FfmpegCropper, HttpCaptioner,
    LoudnessPeakDetector, SegmentDetector, VerticalCropper, VideoSource, YtDlpSource,
};
pub use config::WorkerConfig;
pub use dispatcher::JobDispatcher;
pub use error::{WorkerError, WorkerResult};
pub use logging::JobLogger;
pub use runner::JobRunner;
