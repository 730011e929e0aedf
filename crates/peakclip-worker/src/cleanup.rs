//! Scoped removal of transient job files.

use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use peakclip_models::JobId;
use peakclip_storage::remove_best_effort;

/// A file that must not outlive the scope that created it.
///
/// Call [`ScopedArtifact::cleanup`] on the normal path, or
/// [`ScopedArtifact::keep`] once the file is complete and should stay. If
/// the guard is dropped instead (early return through `?`, or a panic), the
/// file is removed in `drop`. Removal is best-effort either way: a missing
/// file is fine and other failures are only logged.
#[derive(Debug)]
pub struct ScopedArtifact {
    path: PathBuf,
    armed: bool,
}

impl ScopedArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            armed: true,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the file now. Returns true if a file was removed.
    pub async fn cleanup(mut self) -> bool {
        self.armed = false;
        remove_best_effort(&self.path).await
    }

    /// Disarm the guard and leave the file in place.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }
}

impl Drop for ScopedArtifact {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        // Inline unlink: the file has to be gone before the job task returns.
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed artifact on unwind"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove artifact on unwind"
            ),
        }
    }
}

/// Private download directory for one job under the work dir.
///
/// The downloader may leave format fragments and `.part` files next to the
/// source copy, so the whole directory is removed, not just the copy.
#[derive(Debug)]
pub struct JobWorkspace {
    dir: TempDir,
    source: PathBuf,
}

impl JobWorkspace {
    pub async fn create(work_dir: &Path, job_id: &JobId) -> io::Result<Self> {
        tokio::fs::create_dir_all(work_dir).await?;
        let dir = tempfile::Builder::new()
            .prefix(&format!("{}-", job_id))
            .tempdir_in(work_dir)?;
        let source = dir.path().join(format!("{}.mp4", job_id));
        Ok(Self { dir, source })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// Where the source copy is downloaded to.
    pub fn source_path(&self) -> &Path {
        &self.source
    }

    /// Remove the directory and everything in it.
    pub async fn cleanup(self) -> io::Result<()> {
        let dir = self.dir;
        tokio::task::spawn_blocking(move || dir.close())
            .await
            .map_err(io::Error::other)?
    }
}
