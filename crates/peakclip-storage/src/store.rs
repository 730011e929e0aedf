//! Output directory layout and artifact operations.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use peakclip_models::{ArtifactName, JobId};

use crate::error::{StorageError, StorageResult};

const DEFAULT_OUTPUT_DIR: &str = "./outputs";
const DEFAULT_PUBLIC_PREFIX: &str = "/outputs";

/// Output Store configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding temp and final clips
    pub output_dir: PathBuf,
    /// URL path the directory is served under
    pub public_prefix: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            public_prefix: DEFAULT_PUBLIC_PREFIX.to_string(),
        }
    }
}

impl StoreConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            output_dir: std::env::var("OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            public_prefix: std::env::var("PUBLIC_PREFIX")
                .unwrap_or_else(|_| DEFAULT_PUBLIC_PREFIX.to_string()),
        }
    }
}

/// The shared output directory.
///
/// Every path handed out is namespaced by job id and segment index, so
/// concurrent jobs never write the same file and no locking is done.
#[derive(Debug, Clone)]
pub struct OutputStore {
    root: PathBuf,
    public_prefix: String,
}

impl OutputStore {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            root: config.output_dir,
            public_prefix: normalize_prefix(&config.public_prefix),
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> Self {
        Self::new(StoreConfig::from_env())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// URL prefix the store is served under, with a leading and no trailing slash.
    pub fn public_prefix(&self) -> &str {
        &self.public_prefix
    }

    /// Create the output directory if it does not exist.
    pub async fn ensure_dir(&self) -> StorageResult<()> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StorageError::PrepareFailed {
                path: self.root.clone(),
                source,
            })
    }

    pub fn artifact_path(&self, name: &ArtifactName) -> PathBuf {
        self.root.join(name.file_name())
    }

    /// Path of the uncaptioned clip for segment `index`.
    pub fn temp_path(&self, job_id: &JobId, index: usize) -> PathBuf {
        self.artifact_path(&ArtifactName::temp(job_id.as_str(), index))
    }

    /// Path of the captioned clip for segment `index`.
    pub fn final_path(&self, job_id: &JobId, index: usize) -> PathBuf {
        self.artifact_path(&ArtifactName::final_clip(job_id.as_str(), index))
    }

    /// Public, path-only URL of a file in the store.
    pub fn public_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.public_prefix, file_name)
    }

    /// List the final clips of `job_id` currently present, ordered by index.
    ///
    /// A missing output directory is an empty listing.
    pub async fn list_final(&self, job_id: &JobId) -> StorageResult<Vec<ArtifactName>> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::list_failed(format!(
                    "{}: {}",
                    self.root.display(),
                    e
                )))
            }
        };

        let mut clips = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if let Some(name) = ArtifactName::parse(file_name) {
                if name.is_final_for(job_id.as_str()) {
                    clips.push(name);
                }
            }
        }

        clips.sort_by_key(|name| name.index);
        Ok(clips)
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Delete a file, ignoring a missing file and logging any other failure.
///
/// Returns true if a file was removed.
pub async fn remove_best_effort(path: &Path) -> bool {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!(path = %path.display(), "Removed artifact");
            true
        }
        Err(e) if e.kind() == ErrorKind::NotFound => false,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to remove artifact");
            false
        }
    }
}
