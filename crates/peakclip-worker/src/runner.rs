//! The clip pipeline.
//!
//! A job runs four stages strictly in order: acquire the source, detect
//! segments, caption them, then render each segment (crop to a temp clip,
//! burn the caption into the final clip, remove the temp clip). The source
//! is downloaded into a per-job workspace that is removed once the job ends,
//! whether it succeeded or not. Nothing is reported back to the
//! submitter; progress is visible only as final clips appearing in the
//! output store.

use std::future::Future;
use std::path::Path;
use std::time::Instant;

use peakclip_models::{JobId, Segment};
use peakclip_storage::OutputStore;

use crate::cleanup::{JobWorkspace, ScopedArtifact};
use crate::collaborators::Collaborators;
use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::logging::JobLogger;
use crate::metrics;

pub const OPERATION: &str = "clip_pipeline";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Acquire,
    Detect,
    Caption,
    Render,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Acquire => "acquire",
            Stage::Detect => "detect",
            Stage::Caption => "caption",
            Stage::Render => "render",
        }
    }
}

#[derive(Debug)]
struct StageFailure {
    stage: Stage,
    error: WorkerError,
}

async fn timed<T, F>(stage: Stage, fut: F) -> Result<T, StageFailure>
where
    F: Future<Output = WorkerResult<T>>,
{
    let started = Instant::now();
    let result = fut.await;
    metrics::record_stage(stage.as_str(), started.elapsed());
    result.map_err(|error| StageFailure { stage, error })
}

/// Runs the pipeline for one job at a time; share it to run many.
#[derive(Clone)]
pub struct JobRunner {
    collaborators: Collaborators,
    store: OutputStore,
    config: WorkerConfig,
}

impl JobRunner {
    pub fn new(collaborators: Collaborators, store: OutputStore, config: WorkerConfig) -> Self {
        Self {
            collaborators,
            store,
            config,
        }
    }

    pub fn store(&self) -> &OutputStore {
        &self.store
    }

    /// Run the pipeline to completion or to its first failure.
    ///
    /// Failures are logged and swallowed. Clips rendered before the failure
    /// stay in the output store.
    pub async fn run(&self, source: &str, job_id: &JobId) {
        let logger = JobLogger::new(job_id, OPERATION);
        let started = Instant::now();
        logger.started(source);

        match self.execute(source, job_id, &logger).await {
            Ok(rendered) => {
                metrics::record_job_finished(started.elapsed());
                logger.finished(rendered, started.elapsed());
            }
            Err(failure) => {
                metrics::record_job_failed(failure.stage.as_str());
                logger.failed(failure.stage.as_str(), &failure.error);
            }
        }
    }

    /// Acquire the source into a private workspace, process it, then remove
    /// the workspace whatever the outcome.
    async fn execute(
        &self,
        source: &str,
        job_id: &JobId,
        logger: &JobLogger,
    ) -> Result<usize, StageFailure> {
        let c = &self.collaborators;
        let workspace = timed(Stage::Acquire, async {
            let workspace = JobWorkspace::create(&self.config.work_dir, job_id).await?;
            c.source.acquire(source, workspace.source_path()).await?;
            Ok::<_, WorkerError>(workspace)
        })
        .await?;
        logger.stage_done(Stage::Acquire.as_str(), "source copy ready");

        let outcome = self.process(job_id, workspace.source_path(), logger).await;

        let dir = workspace.dir().to_path_buf();
        if let Err(e) = workspace.cleanup().await {
            logger.cleanup_failed(&dir, &e);
        }
        outcome
    }

    async fn process(
        &self,
        job_id: &JobId,
        video: &Path,
        logger: &JobLogger,
    ) -> Result<usize, StageFailure> {
        let c = &self.collaborators;

        let segments = timed(Stage::Detect, c.detector.detect(video)).await?;
        logger.stage_done(
            Stage::Detect.as_str(),
            &format!("{} segments", segments.len()),
        );
        if segments.is_empty() {
            return Ok(0);
        }

        let expected = segments.len();
        let segments = timed(Stage::Caption, async {
            let captioned = c.captioner.caption(video, segments).await?;
            check_captions(expected, &captioned)?;
            Ok::<_, WorkerError>(captioned)
        })
        .await?;
        logger.stage_done(Stage::Caption.as_str(), &format!("{} captions", expected));

        timed(Stage::Render, async {
            self.store.ensure_dir().await?;
            Ok::<_, WorkerError>(())
        })
        .await?;

        let mut rendered = 0;
        for (index, segment) in segments.iter().enumerate() {
            timed(Stage::Render, self.render_segment(job_id, index, segment, video)).await?;
            metrics::record_clip_rendered();
            rendered += 1;
            logger.clip_rendered(index, expected);
        }

        Ok(rendered)
    }

    /// Crop to a temp clip, then burn the caption into the final clip.
    ///
    /// The final clip only survives if the burn succeeds, so a half-written
    /// file is never listed as finished.
    async fn render_segment(
        &self,
        job_id: &JobId,
        index: usize,
        segment: &Segment,
        video: &Path,
    ) -> WorkerResult<()> {
        let c = &self.collaborators;
        let caption = segment
            .caption
            .as_deref()
            .ok_or(WorkerError::MissingCaption { index })?;

        let temp = ScopedArtifact::new(self.store.temp_path(job_id, index));
        c.cropper
            .crop(video, temp.path(), segment.start, self.config.clip_duration)
            .await?;

        let clip = ScopedArtifact::new(self.store.final_path(job_id, index));
        c.burner.burn(temp.path(), clip.path(), caption).await?;
        clip.keep();
        temp.cleanup().await;

        Ok(())
    }
}

/// The captioner must hand back one captioned segment per input segment.
fn check_captions(expected: usize, segments: &[Segment]) -> WorkerResult<()> {
    if segments.len() != expected {
        return Err(WorkerError::CaptionCountMismatch {
            expected,
            actual: segments.len(),
        });
    }
    if let Some(index) = segments.iter().position(|s| !s.is_captioned()) {
        return Err(WorkerError::MissingCaption { index });
    }
    Ok(())
}
