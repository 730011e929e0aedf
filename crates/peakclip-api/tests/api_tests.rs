//! Router-level tests driving the real dispatcher and status resolver with
//! scripted collaborators in place of yt-dlp, FFmpeg and the caption service.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::sync::Semaphore;
use tower::ServiceExt;

use peakclip_api::{create_router, ApiConfig, AppState};
use peakclip_models::{ArtifactName, Segment};
use peakclip_storage::{OutputStore, StoreConfig};
use peakclip_worker::{
    CaptionBurner, Captioner, Collaborators, SegmentDetector, VerticalCropper, VideoSource,
    WorkerConfig, WorkerError, WorkerResult,
};

/// Scripted stand-in for every pipeline stage.
struct ScriptedPipeline {
    starts: Vec<f64>,
    fail_burn_at: Option<usize>,
    gate: Option<Arc<Semaphore>>,
    acquired: AtomicUsize,
}

impl ScriptedPipeline {
    fn new(starts: Vec<f64>) -> Self {
        Self {
            starts,
            fail_burn_at: None,
            gate: None,
            acquired: AtomicUsize::new(0),
        }
    }
}

fn write_file(path: &Path, contents: &[u8]) -> WorkerResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    Ok(())
}

#[async_trait]
impl VideoSource for ScriptedPipeline {
    async fn acquire(&self, _source: &str, dest: &Path) -> WorkerResult<()> {
        self.acquired.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            let _permit = gate
                .acquire()
                .await
                .map_err(|e| WorkerError::Io(std::io::Error::other(e)))?;
        }
        write_file(dest, b"source")
    }
}

#[async_trait]
impl SegmentDetector for ScriptedPipeline {
    async fn detect(&self, _video: &Path) -> WorkerResult<Vec<Segment>> {
        Ok(self.starts.iter().copied().map(Segment::new).collect())
    }
}

#[async_trait]
impl Captioner for ScriptedPipeline {
    async fn caption(&self, _video: &Path, segments: Vec<Segment>) -> WorkerResult<Vec<Segment>> {
        Ok(segments
            .into_iter()
            .map(|s| {
                let caption = format!("moment at {}", s.start);
                s.with_caption(caption)
            })
            .collect())
    }
}

#[async_trait]
impl VerticalCropper for ScriptedPipeline {
    async fn crop(&self, video: &Path, dest: &Path, _start: f64, _duration: f64) -> WorkerResult<()> {
        assert!(video.exists());
        write_file(dest, b"cropped")
    }
}

#[async_trait]
impl CaptionBurner for ScriptedPipeline {
    async fn burn(&self, clip: &Path, dest: &Path, caption: &str) -> WorkerResult<()> {
        assert!(clip.exists());
        let index = dest
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(ArtifactName::parse)
            .map(|n| n.index);
        write_file(dest, caption.as_bytes())?;
        if index.is_some() && index == self.fail_burn_at {
            return Err(WorkerError::Io(std::io::Error::other("encoder crashed")));
        }
        Ok(())
    }
}

struct TestApp {
    dir: TempDir,
    router: Router,
    pipeline: Arc<ScriptedPipeline>,
}

impl TestApp {
    fn new(pipeline: ScriptedPipeline) -> Self {
        Self::with_config(pipeline, ApiConfig::default())
    }

    fn with_config(pipeline: ScriptedPipeline, config: ApiConfig) -> Self {
        let dir = TempDir::new().unwrap();
        let pipeline = Arc::new(pipeline);

        let store = OutputStore::new(StoreConfig {
            output_dir: dir.path().join("outputs"),
            public_prefix: "/outputs".to_string(),
        });
        let worker_config = WorkerConfig {
            work_dir: dir.path().join("downloads"),
            ..Default::default()
        };
        let collaborators = Collaborators {
            source: pipeline.clone(),
            detector: pipeline.clone(),
            captioner: pipeline.clone(),
            cropper: pipeline.clone(),
            burner: pipeline.clone(),
        };

        let state = AppState::with_collaborators(
            config,
            store,
            worker_config,
            collaborators,
        );

        Self {
            dir,
            router: create_router(state, None),
            pipeline,
        }
    }

    fn output_dir(&self) -> PathBuf {
        self.dir.path().join("outputs")
    }

    fn work_dir(&self) -> PathBuf {
        self.dir.path().join("downloads")
    }

    async fn call(&self, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec();
        (status, headers, body)
    }

    async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = self
            .call(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn post_process(&self, body: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method("POST")
            .uri("/process")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, _, body) = self.call(request).await;
        (status, body)
    }

    async fn submit(&self, url: &str) -> String {
        let (status, body) = self.post_process(&json!({ "url": url }).to_string()).await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["status"], "processing");
        body["job_id"].as_str().unwrap().to_string()
    }

    async fn status(&self, job_id: &str) -> Value {
        let (status, body) = self.get_json(&format!("/status/{}", job_id)).await;
        assert_eq!(status, StatusCode::OK);
        body
    }

    fn files_in(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .map(|entries| {
                entries
                    .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
                    .collect()
            })
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Wait until the job has released its source copy and temp clips.
    async fn wait_settled(&self) {
        for _ in 0..250 {
            let temps = Self::files_in(&self.output_dir())
                .iter()
                .any(|n| n.starts_with("temp_"));
            let started = self.pipeline.acquired.load(Ordering::SeqCst) > 0;
            if started && !temps && Self::files_in(&self.work_dir()).is_empty() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("job did not settle");
    }

    async fn wait_for_count(&self, job_id: &str, count: u64) -> Value {
        for _ in 0..250 {
            let status = self.status(job_id).await;
            if status["count"] == count {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("job {} never reported {} clips", job_id, count);
    }
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new(ScriptedPipeline::new(Vec::new()));

    for uri in ["/", "/health"] {
        let (status, body) = app.get_json(uri).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "online");
        assert_eq!(body["message"], "Backend is running!");
        assert!(body["timestamp"].is_string());
    }
}

#[tokio::test]
async fn test_ready_creates_output_dir() {
    let app = TestApp::new(ScriptedPipeline::new(Vec::new()));

    let (status, body) = app.get_json("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert!(app.output_dir().is_dir());
}

#[tokio::test]
async fn test_ready_failure_detail_follows_environment() {
    for (environment, hidden) in [("production", true), ("development", false)] {
        let config = ApiConfig {
            environment: environment.to_string(),
            ..Default::default()
        };
        let app = TestApp::with_config(ScriptedPipeline::new(Vec::new()), config);
        std::fs::write(app.output_dir(), b"not a directory").unwrap();

        let (status, body) = app.get_json("/ready").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        if hidden {
            assert_eq!(detail, "An internal error occurred");
        } else {
            assert!(detail.starts_with("Internal error: "), "{}", detail);
            assert!(detail.contains("outputs"), "{}", detail);
        }
    }
}

#[tokio::test]
async fn test_missing_url_is_rejected_without_scheduling() {
    let app = TestApp::new(ScriptedPipeline::new(vec![0.0]));

    for body in [r#"{}"#, r#"{"url": null}"#, r#"{"url": ""}"#, r#"{"url": "  "}"#] {
        let (status, response) = app.post_process(body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        let response: Value = serde_json::from_slice(&response).unwrap();
        assert_eq!(response, json!({"detail": "Video URL is required"}));
    }

    let (status, _) = app.post_process("{not json").await;
    assert!(status.is_client_error());

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(app.pipeline.acquired.load(Ordering::SeqCst), 0);
    assert!(TestApp::files_in(&app.output_dir()).is_empty());
    assert!(TestApp::files_in(&app.work_dir()).is_empty());
}

#[tokio::test]
async fn test_unknown_job_reports_nothing() {
    let app = TestApp::new(ScriptedPipeline::new(Vec::new()));

    let status = app.status("never-submitted").await;
    assert_eq!(
        status,
        json!({
            "job_id": "never-submitted",
            "clips": [],
            "count": 0,
            "message": "Still processing or no clips found.",
            "finished": false
        })
    );
}

#[tokio::test]
async fn test_job_ids_are_unique() {
    let app = TestApp::new(ScriptedPipeline::new(Vec::new()));

    let first = app.submit("https://example.com/a").await;
    let second = app.submit("https://example.com/a").await;
    assert_ne!(first, second);
    assert!(uuid::Uuid::parse_str(&first).is_ok());
}

#[tokio::test]
async fn test_completed_job_serves_every_clip() {
    let app = TestApp::new(ScriptedPipeline::new(vec![4.0, 30.0, 75.0]));

    let job_id = app.submit("https://example.com/watch?v=1").await;
    let status = app.wait_for_count(&job_id, 3).await;
    app.wait_settled().await;

    assert_eq!(status["finished"], true);
    assert_eq!(status["message"], "Processing complete");
    let clips: Vec<String> = status["clips"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c.as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        clips,
        (0..3)
            .map(|i| format!("/outputs/{}_{}.mp4", job_id, i))
            .collect::<Vec<_>>()
    );

    let (status, _, body) = app
        .call(Request::builder().uri(&clips[1]).body(Body::empty()).unwrap())
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"moment at 30");

    assert!(TestApp::files_in(&app.work_dir()).is_empty());
    assert!(!TestApp::files_in(&app.output_dir())
        .iter()
        .any(|n| n.starts_with("temp_")));
}

#[tokio::test]
async fn test_status_grows_from_zero_and_keeps_clips_after_failure() {
    let gate = Arc::new(Semaphore::new(0));
    let mut pipeline = ScriptedPipeline::new(vec![0.0, 20.0, 40.0]);
    pipeline.fail_burn_at = Some(2);
    pipeline.gate = Some(gate.clone());
    let app = TestApp::new(pipeline);

    let job_id = app.submit("https://example.com/watch?v=2").await;

    let pending = app.status(&job_id).await;
    assert_eq!(pending["count"], 0);
    assert_eq!(pending["finished"], false);
    assert_eq!(pending["message"], "Still processing or no clips found.");

    gate.add_permits(1);

    let partial = app.wait_for_count(&job_id, 2).await;
    app.wait_settled().await;

    assert_eq!(partial["finished"], true);
    assert_eq!(partial["message"], "Processing complete");
    assert_eq!(
        TestApp::files_in(&app.output_dir()),
        vec![format!("{}_0.mp4", job_id), format!("{}_1.mp4", job_id)]
    );
    assert_eq!(app.status(&job_id).await["count"], 2);
}

#[tokio::test]
async fn test_temp_clips_never_reported() {
    let app = TestApp::new(ScriptedPipeline::new(Vec::new()));
    let job_id = uuid::Uuid::new_v4().to_string();

    std::fs::create_dir_all(app.output_dir()).unwrap();
    std::fs::write(app.output_dir().join(format!("temp_{}_0.mp4", job_id)), b"x").unwrap();
    std::fs::write(app.output_dir().join(format!("{}_1.mp4", job_id)), b"x").unwrap();

    let status = app.status(&job_id).await;
    assert_eq!(status["count"], 1);
    assert_eq!(status["clips"], json!([format!("/outputs/{}_1.mp4", job_id)]));
}

#[tokio::test]
async fn test_only_final_clips_are_served() {
    let app = TestApp::new(ScriptedPipeline::new(Vec::new()));
    let job_id = uuid::Uuid::new_v4().to_string();

    std::fs::create_dir_all(app.output_dir()).unwrap();
    std::fs::write(app.output_dir().join(format!("temp_{}_0.mp4", job_id)), b"raw").unwrap();
    std::fs::write(app.output_dir().join(format!("{}_0.mp4", job_id)), b"final").unwrap();
    std::fs::write(app.output_dir().join("notes.txt"), b"stray").unwrap();

    let get = |uri: String| Request::builder().uri(uri).body(Body::empty()).unwrap();

    let (status, _, body) = app.call(get(format!("/outputs/{}_0.mp4", job_id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"final");

    for name in [format!("temp_{}_0.mp4", job_id), "notes.txt".to_string()] {
        let (status, _, _) = app.call(get(format!("/outputs/{}", name))).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", name);
    }
}

#[tokio::test]
async fn test_request_id_and_security_headers() {
    let app = TestApp::new(ScriptedPipeline::new(Vec::new()));

    let (_, headers, _) = app
        .call(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(headers["x-request-id"], "req-123");
    assert_eq!(headers["x-content-type-options"], "nosniff");

    let (_, headers, _) = app
        .call(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await;
    assert!(headers.contains_key("x-request-id"));
}
