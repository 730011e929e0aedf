//! Clip rendering: vertical crop and caption burn.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::filters::{build_caption_filter, wrap_caption, CaptionStyle, CAPTION_LINE_WIDTH, FILTER_VERTICAL};

/// Default video codec (H.264)
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";
/// Default audio codec
pub const DEFAULT_AUDIO_CODEC: &str = "aac";
/// Default encoding preset
pub const DEFAULT_PRESET: &str = "fast";
/// Default CRF (Constant Rate Factor)
pub const DEFAULT_CRF: u8 = 20;
/// Default audio bitrate
pub const DEFAULT_AUDIO_BITRATE: &str = "128k";

fn with_default_encoding(cmd: FfmpegCommand) -> FfmpegCommand {
    cmd.video_codec(DEFAULT_VIDEO_CODEC)
        .preset(DEFAULT_PRESET)
        .crf(DEFAULT_CRF)
        .audio_codec(DEFAULT_AUDIO_CODEC)
        .audio_bitrate(DEFAULT_AUDIO_BITRATE)
        .output_args(["-movflags", "+faststart"])
}

/// Cut `duration` seconds from `start` and crop to a 1080x1920 vertical frame.
pub async fn crop_vertical(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    start: f64,
    duration: f64,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    info!(
        "Cropping vertical clip: {} -> {} (start: {:.2}s, duration: {:.2}s)",
        input.display(),
        output.display(),
        start,
        duration
    );

    let cmd = with_default_encoding(
        FfmpegCommand::new(input, output)
            .seek(start.max(0.0))
            .duration(duration)
            .video_filter(FILTER_VERTICAL),
    );

    FfmpegRunner::new().run(&cmd).await
}

/// Burn `caption` into `input`, writing the result to `output`.
pub async fn burn_caption(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    caption: &str,
    style: &CaptionStyle,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    if !input.exists() {
        return Err(MediaError::FileNotFound(input.to_path_buf()));
    }

    let mut text_file = NamedTempFile::new()?;
    text_file.write_all(wrap_caption(caption, CAPTION_LINE_WIDTH).as_bytes())?;
    text_file.flush()?;

    info!(
        "Burning caption: {} -> {} ({} chars)",
        input.display(),
        output.display(),
        caption.chars().count()
    );

    let cmd = with_default_encoding(
        FfmpegCommand::new(input, output)
            .video_filter(build_caption_filter(text_file.path(), style)),
    );

    FfmpegRunner::new().run(&cmd).await
}
