//! Application state.

use std::sync::Arc;

use peakclip_caption_client::CaptionClient;
use peakclip_storage::{OutputStore, StatusResolver};
use peakclip_worker::{Collaborators, JobDispatcher, JobRunner, WorkerConfig};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub dispatcher: JobDispatcher,
    pub resolver: StatusResolver,
}

impl AppState {
    /// Wire the default collaborators from environment configuration.
    pub fn new(config: ApiConfig, store: OutputStore) -> anyhow::Result<Self> {
        let worker_config = WorkerConfig::from_env();
        let captions = CaptionClient::from_env()?;
        let collaborators = Collaborators::defaults(&worker_config, captions);

        Ok(Self::with_collaborators(config, store, worker_config, collaborators))
    }

    /// Build state around explicit collaborators.
    pub fn with_collaborators(
        config: ApiConfig,
        store: OutputStore,
        worker_config: WorkerConfig,
        collaborators: Collaborators,
    ) -> Self {
        let runner = JobRunner::new(collaborators, store.clone(), worker_config);

        Self {
            config: Arc::new(config),
            dispatcher: JobDispatcher::new(runner),
            resolver: StatusResolver::new(store),
        }
    }

    pub fn store(&self) -> &OutputStore {
        self.resolver.store()
    }
}
