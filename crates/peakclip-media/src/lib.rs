//! FFmpeg CLI wrapper for clip production.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building and execution
//! - Source acquisition through yt-dlp
//! - Loudness-based peak segment detection
//! - Vertical cropping and caption burning

pub mod command;
pub mod detect;
pub mod download;
pub mod error;
pub mod filters;
pub mod render;

pub use command::{check_ffmpeg, check_ffprobe, check_ytdlp, FfmpegCommand, FfmpegRunner};
pub use detect::{detect_peak_segments, pick_peaks, DetectionConfig, LoudnessWindow};
pub use download::download_video;
pub use error::{MediaError, MediaResult};
pub use filters::CaptionStyle;
pub use render::{burn_caption, crop_vertical};
