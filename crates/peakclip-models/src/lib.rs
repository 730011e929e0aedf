//! Shared data models for the PeakClip backend.
//!
//! This crate provides Serde-serializable types for:
//! - Job identifiers and submission payloads
//! - Detected segments and their captions
//! - Output Store artifact naming
//! - Job status responses

pub mod artifact;
pub mod job;
pub mod segment;
pub mod status;

// Re-export common types
pub use artifact::{ArtifactKind, ArtifactName, CLIP_EXTENSION, TEMP_MARKER};
pub use job::{JobId, ProcessRequest, ProcessResponse, SubmissionError, PROCESSING};
pub use segment::Segment;
pub use status::{status_message, JobStatus, MESSAGE_COMPLETE, MESSAGE_PENDING};
