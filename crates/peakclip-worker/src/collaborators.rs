//! Collaborators consumed by the job runner.
//!
//! Each pipeline stage is a trait so the runner can be driven by fakes in
//! tests. The default implementations shell out to yt-dlp and FFmpeg, and call
//! the caption service over HTTP.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use peakclip_caption_client::CaptionClient;
use peakclip_media::{CaptionStyle, DetectionConfig};
use peakclip_models::Segment;

use crate::config::WorkerConfig;
use crate::error::WorkerResult;

/// Obtains a local copy of a source video.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Fetch `source` and write it to `dest`.
    async fn acquire(&self, source: &str, dest: &Path) -> WorkerResult<()>;
}

/// Finds the segments worth clipping. May return none.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SegmentDetector: Send + Sync {
    async fn detect(&self, video: &Path) -> WorkerResult<Vec<Segment>>;
}

/// Attaches caption text to every segment.
///
/// Must return the segments in the order given, one for one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Captioner: Send + Sync {
    async fn caption(&self, video: &Path, segments: Vec<Segment>) -> WorkerResult<Vec<Segment>>;
}

/// Cuts a vertical clip out of the source.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VerticalCropper: Send + Sync {
    async fn crop(&self, video: &Path, dest: &Path, start: f64, duration: f64) -> WorkerResult<()>;
}

/// Renders caption text into a clip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionBurner: Send + Sync {
    async fn burn(&self, clip: &Path, dest: &Path, caption: &str) -> WorkerResult<()>;
}

/// The full set of collaborators a runner needs.
#[derive(Clone)]
pub struct Collaborators {
    pub source: Arc<dyn VideoSource>,
    pub detector: Arc<dyn SegmentDetector>,
    pub captioner: Arc<dyn Captioner>,
    pub cropper: Arc<dyn VerticalCropper>,
    pub burner: Arc<dyn CaptionBurner>,
}

impl Collaborators {
    /// yt-dlp, FFmpeg and the HTTP caption service.
    pub fn defaults(config: &WorkerConfig, captions: CaptionClient) -> Self {
        Self {
            source: Arc::new(YtDlpSource),
            detector: Arc::new(LoudnessPeakDetector::new(config.detection())),
            captioner: Arc::new(HttpCaptioner::new(captions, config.clip_duration)),
            cropper: Arc::new(FfmpegCropper),
            burner: Arc::new(FfmpegCaptionBurner::new(config.caption_style())),
        }
    }
}

/// Downloads with yt-dlp.
#[derive(Debug, Clone, Default)]
pub struct YtDlpSource;

#[async_trait]
impl VideoSource for YtDlpSource {
    async fn acquire(&self, source: &str, dest: &Path) -> WorkerResult<()> {
        peakclip_media::download_video(source, dest).await?;
        Ok(())
    }
}

/// Picks the loudest windows of the audio track.
#[derive(Debug, Clone, Default)]
pub struct LoudnessPeakDetector {
    config: DetectionConfig,
}

impl LoudnessPeakDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SegmentDetector for LoudnessPeakDetector {
    async fn detect(&self, video: &Path) -> WorkerResult<Vec<Segment>> {
        Ok(peakclip_media::detect_peak_segments(video, &self.config).await?)
    }
}

/// Captions segments through the caption service.
#[derive(Debug, Clone)]
pub struct HttpCaptioner {
    client: CaptionClient,
    clip_duration: f64,
}

impl HttpCaptioner {
    pub fn new(client: CaptionClient, clip_duration: f64) -> Self {
        Self {
            client,
            clip_duration,
        }
    }
}

#[async_trait]
impl Captioner for HttpCaptioner {
    async fn caption(&self, video: &Path, segments: Vec<Segment>) -> WorkerResult<Vec<Segment>> {
        let captions = self
            .client
            .caption(video, &segments, self.clip_duration)
            .await?;

        Ok(segments
            .into_iter()
            .zip(captions)
            .map(|(segment, caption)| segment.with_caption(caption))
            .collect())
    }
}

/// 9:16 crop with FFmpeg.
#[derive(Debug, Clone, Default)]
pub struct FfmpegCropper;

#[async_trait]
impl VerticalCropper for FfmpegCropper {
    async fn crop(&self, video: &Path, dest: &Path, start: f64, duration: f64) -> WorkerResult<()> {
        peakclip_media::crop_vertical(video, dest, start, duration).await?;
        Ok(())
    }
}

/// `drawtext` caption burn with FFmpeg.
#[derive(Debug, Clone, Default)]
pub struct FfmpegCaptionBurner {
    style: CaptionStyle,
}

impl FfmpegCaptionBurner {
    pub fn new(style: CaptionStyle) -> Self {
        Self { style }
    }
}

#[async_trait]
impl CaptionBurner for FfmpegCaptionBurner {
    async fn burn(&self, clip: &Path, dest: &Path, caption: &str) -> WorkerResult<()> {
        peakclip_media::burn_caption(clip, dest, caption, &self.style).await?;
        Ok(())
    }
}
