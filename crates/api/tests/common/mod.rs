#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use msp_core::health::{ResourceKind, ThresholdSet};
use msp_monitor::memory::{InMemoryHistoryStore, InMemoryRegistry, StaticMetricsSource};
use msp_monitor::{CheckExecutor, ClientRegistry, HealthMonitor, HistoryStore, ServiceState};
use tower::ServiceExt;

use msp_api::config::ServerConfig;
use msp_api::router::build_app_router;
use msp_api::state::AppState;

pub const ALLOWED_ORIGIN: &str = "https://ops.example.com";

/// Build a test `ServerConfig` with one allowed browser origin.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec![ALLOWED_ORIGIN.to_string()],
        ..ServerConfig::default()
    }
}

/// Metrics for `acme-corp`: every resource well under threshold, `nginx`
/// running, disk at warning level.
pub fn acme_metrics() -> StaticMetricsSource {
    let source = StaticMetricsSource::new();
    source.set_utilization("acme-corp", ResourceKind::Cpu, 35.0);
    source.set_utilization("acme-corp", ResourceKind::Memory, 48.5);
    source.set_utilization("acme-corp", ResourceKind::Disk, 88.0);
    source.set_utilization("acme-corp", ResourceKind::Network, 5.0);
    source.set_service_state("acme-corp", "nginx", ServiceState::Up);
    source
}

/// Build the app over explicit capabilities. Pushed readings land in
/// `metrics`.
pub fn build_app_with(
    registry: Arc<dyn ClientRegistry>,
    history: Arc<dyn HistoryStore>,
    metrics: StaticMetricsSource,
) -> Router {
    let metrics = Arc::new(metrics);
    let executor = CheckExecutor::new(
        metrics.clone(),
        ThresholdSet::new(),
        vec!["nginx".to_string()],
        Duration::from_millis(500),
    );
    let monitor = HealthMonitor::new(registry, history, executor).with_reading_sink(metrics);
    let state = AppState {
        monitor: Arc::new(monitor),
    };
    build_app_router(state, &test_config())
}

/// Build the app with `acme-corp` and `globex` registered and an empty
/// in-memory history.
pub fn build_test_app() -> Router {
    build_app_with(
        Arc::new(InMemoryRegistry::new(["acme-corp", "globex"])),
        Arc::new(InMemoryHistoryStore::new()),
        acme_metrics(),
    )
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send a CORS preflight for a POST from `origin`.
pub async fn preflight(app: Router, uri: &str, origin: &str) -> Response {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri(uri)
        .header("origin", origin)
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}
