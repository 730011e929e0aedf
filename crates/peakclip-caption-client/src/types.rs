//! Caption service request/response types.

use serde::{Deserialize, Serialize};

/// Time window of one segment as sent to the caption service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentWindow {
    /// Start offset in seconds
    pub start: f64,
    /// Length in seconds
    pub duration: f64,
}

/// Request for segment captions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionRequest {
    /// Local path of the source video
    pub video_path: String,
    /// Segments to caption, in order
    pub segments: Vec<SegmentWindow>,
}

/// Captions for the requested segments, in request order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptionResponse {
    pub captions: Vec<String>,
}

/// Health check response.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
