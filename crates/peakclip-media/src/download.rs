//! Video download using yt-dlp.

use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info};

use crate::command::{check_ytdlp, stderr_tail};
use crate::error::{MediaError, MediaResult};

/// Format preference: MP4 video with M4A audio, falling back to any single file.
const FORMAT_SELECTOR: &str = "bestvideo[ext=mp4]+bestaudio[ext=m4a]/best[ext=mp4]/best";

/// Build yt-dlp arguments for a full download.
fn build_download_args(url: &str, output_path: &Path) -> Vec<String> {
    vec![
        "--no-playlist".to_string(),
        "--no-progress".to_string(),
        "--force-overwrites".to_string(),
        "--merge-output-format".to_string(),
        "mp4".to_string(),
        "-f".to_string(),
        FORMAT_SELECTOR.to_string(),
        "-o".to_string(),
        output_path.to_string_lossy().to_string(),
        // Terminate option parsing so a reference can never be read as a flag.
        "--".to_string(),
        url.to_string(),
    ]
}

/// Download a video from URL using yt-dlp.
///
/// Any existing file at `output_path` is overwritten.
///
/// # Returns
///
/// - `Ok(())` if the file exists after yt-dlp exits successfully
/// - `Err(MediaError::DownloadFailed)` on a non-zero exit or a missing file
pub async fn download_video(url: &str, output_path: impl AsRef<Path>) -> MediaResult<()> {
    let output_path = output_path.as_ref();

    check_ytdlp()?;

    if let Some(parent) = output_path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    info!(
        "Downloading video from {} to {}",
        url,
        output_path.display()
    );

    let output = Command::new("yt-dlp")
        .args(build_download_args(url, output_path))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        debug!("yt-dlp stderr: {}", stderr_tail(&stderr));

        let error_msg = stderr.lines().last().unwrap_or("Unknown error");
        return Err(MediaError::download_failed(format!(
            "yt-dlp failed: {}",
            error_msg
        )));
    }

    if !output_path.exists() {
        return Err(MediaError::download_failed("Output file not created"));
    }

    let file_size = output_path.metadata()?.len();
    info!(
        output = %output_path.display(),
        size_mb = file_size as f64 / (1024.0 * 1024.0),
        "Downloaded video successfully"
    );

    Ok(())
}
