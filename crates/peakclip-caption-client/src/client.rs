//! Caption service HTTP client.

use std::path::Path;

use reqwest::Client;
use tracing::{debug, warn};

use peakclip_models::Segment;

use crate::error::{CaptionError, CaptionResult};
use crate::types::{CaptionRequest, CaptionResponse, HealthResponse, SegmentWindow};

const DEFAULT_BASE_URL: &str = "http://localhost:8001";

/// Configuration for the caption client.
#[derive(Debug, Clone)]
pub struct CaptionClientConfig {
    /// Base URL of the caption service
    pub base_url: String,
}

impl Default for CaptionClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl CaptionClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("CAPTION_SERVICE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
        }
    }
}

/// Client for the caption service.
///
/// Requests are sent once with no client-side timeout; captioning a long
/// source can take minutes.
#[derive(Debug, Clone)]
pub struct CaptionClient {
    http: Client,
    config: CaptionClientConfig,
}

impl CaptionClient {
    /// Create a new caption client.
    pub fn new(config: CaptionClientConfig) -> CaptionResult<Self> {
        let http = Client::builder().build().map_err(CaptionError::Network)?;
        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> CaptionResult<Self> {
        Self::new(CaptionClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// Check if the caption service is healthy.
    pub async fn health_check(&self) -> CaptionResult<bool> {
        let url = format!("{}/health", self.base_url());

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("Caption service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("Caption service health check error: {}", e);
                Ok(false)
            }
        }
    }

    /// Caption each segment of the video at `video_path`.
    ///
    /// Every segment is described to the service as `duration` seconds from
    /// its start. The returned captions line up with `segments` by index; a
    /// response with a different number of captions is rejected.
    pub async fn caption(
        &self,
        video_path: &Path,
        segments: &[Segment],
        duration: f64,
    ) -> CaptionResult<Vec<String>> {
        let url = format!("{}/captions", self.base_url());
        let request = CaptionRequest {
            video_path: video_path.to_string_lossy().to_string(),
            segments: segments
                .iter()
                .map(|s| SegmentWindow {
                    start: s.start,
                    duration,
                })
                .collect(),
        };

        debug!(segments = segments.len(), "Sending caption request to {}", url);

        let response = self.http.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(CaptionError::RequestFailed(format!(
                "Caption service returned {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let parsed: CaptionResponse = serde_json::from_str(&body)
            .map_err(|e| CaptionError::InvalidResponse(e.to_string()))?;

        if parsed.captions.len() != segments.len() {
            return Err(CaptionError::CountMismatch {
                expected: segments.len(),
                actual: parsed.captions.len(),
            });
        }

        Ok(parsed.captions)
    }
}
