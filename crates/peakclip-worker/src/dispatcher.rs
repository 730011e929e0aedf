//! Job submission.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{info, Instrument};

use peakclip_models::{JobId, ProcessRequest, SubmissionError};

use crate::logging::JobLogger;
use crate::metrics;
use crate::runner::{JobRunner, OPERATION};

/// Validates submissions and starts a runner for each one in the background.
///
/// The dispatcher never touches the output store itself and never waits on a
/// runner. Jobs are not tracked after they are spawned: there is no
/// cancellation, no concurrency limit and no queue.
#[derive(Clone)]
pub struct JobDispatcher {
    runner: Arc<JobRunner>,
}

impl JobDispatcher {
    pub fn new(runner: JobRunner) -> Self {
        Self {
            runner: Arc::new(runner),
        }
    }

    /// Accept a request and schedule its job.
    ///
    /// Returns the fresh job id without waiting for any pipeline stage. An
    /// empty or missing source is rejected and nothing is scheduled. Must be
    /// called from within a Tokio runtime.
    pub fn submit(&self, request: &ProcessRequest) -> Result<JobId, SubmissionError> {
        let source = request.validate()?.to_string();
        let job_id = JobId::new();

        self.spawn(source, job_id.clone());
        metrics::record_job_submitted();
        info!(job_id = %job_id, "Job submitted");

        Ok(job_id)
    }

    fn spawn(&self, source: String, job_id: JobId) -> JoinHandle<()> {
        let runner = Arc::clone(&self.runner);
        let span = JobLogger::new(&job_id, OPERATION).span();

        tokio::spawn(
            async move {
                runner.run(&source, &job_id).await;
            }
            .instrument(span),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use peakclip_storage::{OutputStore, StoreConfig};
    use tempfile::TempDir;

    use crate::collaborators::{
        Collaborators, MockCaptionBurner, MockCaptioner, MockSegmentDetector,
        MockVerticalCropper, VideoSource,
    };
    use crate::config::WorkerConfig;
    use crate::error::{WorkerError, WorkerResult};

    /// Counts acquisitions and fails them so the pipeline stops right away.
    struct CountingSource(Arc<AtomicUsize>);

    #[async_trait]
    impl VideoSource for CountingSource {
        async fn acquire(&self, _source: &str, _dest: &Path) -> WorkerResult<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Err(WorkerError::Io(std::io::Error::other("offline")))
        }
    }

    fn dispatcher(dir: &TempDir, acquired: Arc<AtomicUsize>) -> JobDispatcher {
        let mut detector = MockSegmentDetector::new();
        detector.expect_detect().never();

        let collaborators = Collaborators {
            source: Arc::new(CountingSource(acquired)),
            detector: Arc::new(detector),
            captioner: Arc::new(MockCaptioner::new()),
            cropper: Arc::new(MockVerticalCropper::new()),
            burner: Arc::new(MockCaptionBurner::new()),
        };
        let store = OutputStore::new(StoreConfig {
            output_dir: dir.path().join("out"),
            public_prefix: "/outputs".to_string(),
        });
        let config = WorkerConfig {
            work_dir: dir.path().join("work"),
            ..Default::default()
        };

        JobDispatcher::new(JobRunner::new(collaborators, store, config))
    }

    #[tokio::test]
    async fn test_submit_returns_unique_ids() {
        let dir = TempDir::new().unwrap();
        let dispatcher = dispatcher(&dir, Arc::new(AtomicUsize::new(0)));

        let ids: HashSet<JobId> = (0..50)
            .map(|i| {
                dispatcher
                    .submit(&ProcessRequest::new(format!("http://video/{}", i)))
                    .unwrap()
            })
            .collect();

        assert_eq!(ids.len(), 50);
    }

    #[tokio::test]
    async fn test_rejected_submission_schedules_nothing() {
        let dir = TempDir::new().unwrap();
        let acquired = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher(&dir, acquired.clone());

        for request in [
            ProcessRequest::default(),
            ProcessRequest::new(""),
            ProcessRequest::new("   "),
        ] {
            assert_eq!(
                dispatcher.submit(&request),
                Err(SubmissionError::MissingSource)
            );
        }

        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(acquired.load(Ordering::SeqCst), 0);
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_spawned_runner_receives_source() {
        let dir = TempDir::new().unwrap();
        let acquired = Arc::new(AtomicUsize::new(0));
        let dispatcher = dispatcher(&dir, acquired.clone());

        dispatcher
            .spawn("http://video".to_string(), JobId::new())
            .await
            .unwrap();

        assert_eq!(acquired.load(Ordering::SeqCst), 1);
    }
}
