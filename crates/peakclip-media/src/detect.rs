//! Loudness-based peak segment detection.
//!
//! The source audio is resampled to 16kHz mono and cut into consecutive
//! windows of the clip length. FFmpeg's `astats` measures the RMS level of
//! each window and `ametadata` writes one record per window to a log file:
//!
//! ```text
//! frame:0    pts:0       pts_time:0
//! lavfi.astats.Overall.RMS_level=-27.561289
//! ```
//!
//! The loudest windows become the segments.

use std::cmp::Ordering;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use peakclip_models::Segment;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::escape_filter_value;

/// Sample rate used for loudness analysis.
const ANALYSIS_SAMPLE_RATE: u32 = 16_000;

const RMS_KEY: &str = "lavfi.astats.Overall.RMS_level";

/// Detection parameters.
#[derive(Debug, Clone)]
pub struct DetectionConfig {
    /// Window length in seconds; equals the clip duration.
    pub window_secs: f64,
    /// Maximum number of segments returned.
    pub max_segments: usize,
    /// Windows quieter than this (dBFS) are never picked.
    pub silence_floor_db: f64,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            window_secs: 12.0,
            max_segments: 5,
            silence_floor_db: -60.0,
        }
    }
}

/// RMS level of one analysis window.
#[derive(Debug, Clone, PartialEq)]
pub struct LoudnessWindow {
    pub start: f64,
    pub rms_db: f64,
}

/// Build the audio filter chain that logs per-window loudness to `log_path`.
fn loudness_filter(config: &DetectionConfig, log_path: &Path) -> String {
    let samples = (config.window_secs * ANALYSIS_SAMPLE_RATE as f64).round().max(1.0) as u64;
    format!(
        "aresample={rate},aformat=channel_layouts=mono,asetnsamples=n={samples}:p=0,\
         astats=metadata=1:reset=1,ametadata=mode=print:key={key}:file='{file}'",
        rate = ANALYSIS_SAMPLE_RATE,
        samples = samples,
        key = RMS_KEY,
        file = escape_filter_value(&log_path.to_string_lossy()),
    )
}

/// Parse the `ametadata` log into windows.
///
/// Records without a parseable `pts_time` are skipped; a level of `-inf`
/// (digital silence) is kept as negative infinity.
pub fn parse_loudness_log(log: &str) -> Vec<LoudnessWindow> {
    let mut windows = Vec::new();
    let mut current_start: Option<f64> = None;

    for line in log.lines() {
        let line = line.trim();

        if line.starts_with("frame:") {
            current_start = line
                .split_whitespace()
                .find_map(|field| field.strip_prefix("pts_time:"))
                .and_then(|v| v.parse().ok());
        } else if let Some(value) = line
            .strip_prefix(RMS_KEY)
            .and_then(|rest| rest.strip_prefix('='))
        {
            if let (Some(start), Ok(rms_db)) = (current_start.take(), value.parse::<f64>()) {
                windows.push(LoudnessWindow { start, rms_db });
            }
        }
    }

    windows
}

/// Choose the loudest windows above the silence floor.
///
/// Returns at most `max_segments` segments ordered by start offset.
pub fn pick_peaks(windows: &[LoudnessWindow], config: &DetectionConfig) -> Vec<Segment> {
    let mut candidates: Vec<&LoudnessWindow> = windows
        .iter()
        .filter(|w| w.rms_db.is_finite() && w.rms_db > config.silence_floor_db)
        .collect();

    candidates.sort_by(|a, b| {
        b.rms_db
            .partial_cmp(&a.rms_db)
            .unwrap_or(Ordering::Equal)
            .then(a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal))
    });

    let mut picked: Vec<f64> = Vec::with_capacity(config.max_segments);
    for window in candidates {
        if picked.len() >= config.max_segments {
            break;
        }
        let overlaps = picked
            .iter()
            .any(|start| (start - window.start).abs() < config.window_secs);
        if !overlaps {
            picked.push(window.start);
        }
    }

    picked.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    picked.into_iter().map(Segment::new).collect()
}

/// Detect the loudest segments of a video.
///
/// May return an empty list.
pub async fn detect_peak_segments(
    source: impl AsRef<Path>,
    config: &DetectionConfig,
) -> MediaResult<Vec<Segment>> {
    let source = source.as_ref();

    if !source.exists() {
        return Err(MediaError::FileNotFound(source.to_path_buf()));
    }
    if config.window_secs <= 0.0 {
        return Err(MediaError::detection_failed("window length must be positive"));
    }

    let log_file = NamedTempFile::new()?;

    let cmd = FfmpegCommand::new(source, "-")
        .no_video()
        .audio_filter(loudness_filter(config, log_file.path()))
        .format("null");

    FfmpegRunner::new().run(&cmd).await.map_err(|e| {
        MediaError::detection_failed(format!("loudness analysis failed: {}", e))
    })?;

    let log = tokio::fs::read_to_string(log_file.path()).await?;
    let windows = parse_loudness_log(&log);
    debug!(windows = windows.len(), "Parsed loudness windows");

    let segments = pick_peaks(&windows, config);
    info!(
        source = %source.display(),
        segments = segments.len(),
        "Detected peak segments"
    );

    Ok(segments)
}
