//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;

use crate::handlers::{health, job_status, process_video, ready};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, final_clips_only, request_id, request_logging, security_headers,
};
use crate::state::AppState;

/// Create the API router.
///
/// Final clips are served read-only from the output directory under the
/// store's public prefix, the same prefix the status URLs use. Temp clips in
/// the same directory are not served.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let api_routes = Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/ready", get(ready))
        .route("/process", post(process_video))
        .route("/status/:job_id", get(job_status));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    let clips = ServiceBuilder::new()
        .layer(middleware::from_fn(final_clips_only))
        .service(ServeDir::new(state.store().root()));
    let prefix = state.store().public_prefix().to_string();
    let router = api_routes.merge(metrics_routes);
    let router = if prefix.is_empty() {
        router.fallback_service(clips)
    } else {
        router.nest_service(&prefix, clips)
    };

    router
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
