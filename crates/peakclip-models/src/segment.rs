//! Detected segments.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A time window in the source video that becomes one clip.
///
/// Segments travel through the pipeline as an ordered sequence; the position
/// in that sequence is the clip index used in artifact names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Segment {
    /// Offset into the source video in seconds.
    pub start: f64,

    /// Caption text, filled in by the captioning stage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl Segment {
    /// A freshly detected segment with no caption yet.
    pub fn new(start: f64) -> Self {
        Self {
            start,
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn is_captioned(&self) -> bool {
        self.caption.is_some()
    }
}
