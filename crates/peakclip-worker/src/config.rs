//! Worker configuration.

use std::path::PathBuf;

use peakclip_media::{CaptionStyle, DetectionConfig};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Directory for downloaded source videos
    pub work_dir: PathBuf,
    /// Length of every rendered clip in seconds
    pub clip_duration: f64,
    /// Maximum segments detected per job
    pub max_segments: usize,
    /// Font used for burned captions
    pub caption_font: Option<PathBuf>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("./downloads"),
            clip_duration: 12.0,
            max_segments: 5,
            caption_font: None,
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            work_dir: std::env::var("WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.work_dir),
            clip_duration: std::env::var("CLIP_DURATION_SECS")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|d| d.is_finite() && *d > 0.0)
                .unwrap_or(defaults.clip_duration),
            max_segments: std::env::var("MAX_SEGMENTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_segments),
            caption_font: std::env::var("CAPTION_FONT_FILE").ok().map(PathBuf::from),
        }
    }

    pub fn detection(&self) -> DetectionConfig {
        DetectionConfig {
            window_secs: self.clip_duration,
            max_segments: self.max_segments,
            ..Default::default()
        }
    }

    pub fn caption_style(&self) -> CaptionStyle {
        CaptionStyle {
            font_file: self.caption_font.clone(),
            ..Default::default()
        }
    }
}
