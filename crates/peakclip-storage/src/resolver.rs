//! Job status derived from the Output Store.

use tracing::warn;

use peakclip_models::{JobId, JobStatus};

use crate::store::OutputStore;

/// Answers "what has this job produced so far".
///
/// There is no job table. The listing of final clips is the whole status, so
/// an unknown id and a job still working on its first clip both report zero
/// clips.
#[derive(Debug, Clone)]
pub struct StatusResolver {
    store: OutputStore,
}

impl StatusResolver {
    pub fn new(store: OutputStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &OutputStore {
        &self.store
    }

    /// Report the final clips currently present for `job_id`.
    ///
    /// An unreadable output directory is logged and reported as no clips.
    pub async fn query(&self, job_id: &JobId) -> JobStatus {
        let clips = match self.store.list_final(job_id).await {
            Ok(names) => names
                .iter()
                .map(|name| self.store.public_url(&name.file_name()))
                .collect(),
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "Failed to list output directory");
                Vec::new()
            }
        };

        JobStatus::from_clips(job_id.clone(), clips)
    }
}
