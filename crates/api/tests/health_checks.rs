//! Integration tests for the health monitoring endpoints.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{
    body_json, build_app_with, build_test_app, get, post_empty, post_json, preflight,
    ALLOWED_ORIGIN,
};
use msp_core::health::CheckResult;
use msp_core::types::{ClientId, Timestamp};
use msp_monitor::memory::{InMemoryHistoryStore, InMemoryRegistry, StaticMetricsSource};
use msp_monitor::{ClientRegistry, HistoryStore, RegistryError, StoreError};
use serde_json::json;
use tower::ServiceExt;

struct DownRegistry;

#[async_trait]
impl ClientRegistry for DownRegistry {
    async fn exists(&self, _: &str) -> Result<bool, RegistryError> {
        Err(RegistryError::Unavailable("connection refused".into()))
    }

    async fn list_targets(&self) -> Result<Vec<ClientId>, RegistryError> {
        Err(RegistryError::Unavailable("connection refused".into()))
    }
}

struct ReadOnlyStore;

#[async_trait]
impl HistoryStore for ReadOnlyStore {
    async fn append(&self, _: &CheckResult) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("password authentication failed for user msp".into()))
    }

    async fn list(&self, _: &str, _: Timestamp) -> Result<Vec<CheckResult>, StoreError> {
        Ok(Vec::new())
    }

    async fn latest_per_type(&self, _: &str) -> Result<Vec<CheckResult>, StoreError> {
        Ok(Vec::new())
    }

    async fn prune_older_than(&self, _: Timestamp) -> Result<u64, StoreError> {
        Ok(0)
    }
}

// ---------------------------------------------------------------------------
// Liveness
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_ok_with_version() {
    let response = get(build_test_app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

// ---------------------------------------------------------------------------
// Run checks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn run_checks_without_body_runs_default_set() {
    let response = post_empty(build_test_app(), "/api/v1/clients/acme-corp/health/checks").await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let results = json["data"].as_array().unwrap();
    let types: Vec<&str> = results
        .iter()
        .map(|r| r["check_type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["cpu", "memory", "disk", "service"]);
    assert_eq!(results[2]["status"], "warning");
    assert_eq!(results[2]["value"], 88.0);
    assert_eq!(results[2]["threshold"], 85.0);
}

#[tokio::test]
async fn run_checks_with_explicit_types() {
    let response = post_json(
        build_test_app(),
        "/api/v1/clients/acme-corp/health/checks",
        json!({ "check_types": ["Network", "CPU"] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["check_type"], "network");
    assert_eq!(json["data"][1]["check_type"], "cpu");
}

#[tokio::test]
async fn run_checks_rejects_unknown_type() {
    let response = post_json(
        build_test_app(),
        "/api/v1/clients/acme-corp/health/checks",
        json!({ "check_types": ["cpu", "gpu"] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_CHECK_TYPE");
}

#[tokio::test]
async fn run_checks_rejects_empty_type_list() {
    let response = post_json(
        build_test_app(),
        "/api/v1/clients/acme-corp/health/checks",
        json!({ "check_types": [] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_PARAMETER");
}

#[tokio::test]
async fn run_checks_rejects_malformed_body() {
    let response = post_json(
        build_test_app(),
        "/api/v1/clients/acme-corp/health/checks",
        json!({ "check_types": "cpu" }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn run_checks_unknown_client_is_404() {
    let response = post_empty(build_test_app(), "/api/v1/clients/ghost/health/checks").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "TARGET_NOT_FOUND");
    assert_eq!(json["error"], "Client 'ghost' not found");
}

#[tokio::test]
async fn persistence_failure_is_sanitized_500() {
    let app = build_app_with(
        Arc::new(InMemoryRegistry::new(["acme-corp"])),
        Arc::new(ReadOnlyStore),
        common::acme_metrics(),
    );

    let response = post_empty(app, "/api/v1/clients/acme-corp/health/checks").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "PERSISTENCE_ERROR");
    assert!(!json["error"].as_str().unwrap().contains("password"));
}

#[tokio::test]
async fn registry_outage_is_503() {
    let app = build_app_with(
        Arc::new(DownRegistry),
        Arc::new(InMemoryHistoryStore::new()),
        StaticMetricsSource::new(),
    );

    let response = get(app, "/api/v1/clients/acme-corp/health/summary").await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["code"], "REGISTRY_UNAVAILABLE");
}

#[tokio::test]
async fn run_checks_all_reports_every_client() {
    let response = post_json(
        build_test_app(),
        "/api/v1/health/checks",
        json!({ "check_types": ["cpu"] }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let reports = json["data"].as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["client_id"], "acme-corp");
    assert_eq!(reports[0]["results"][0]["status"], "healthy");
    // globex has no readings at all.
    assert_eq!(reports[1]["client_id"], "globex");
    assert_eq!(reports[1]["results"][0]["status"], "unknown");
}

// ---------------------------------------------------------------------------
// History and summary
// ---------------------------------------------------------------------------

#[tokio::test]
async fn history_and_summary_follow_a_run() {
    let app = build_test_app();

    let response = post_empty(app.clone(), "/api/v1/clients/acme-corp/health/checks").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = get(app.clone(), "/api/v1/clients/acme-corp/health/history").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 4);

    let response = get(app, "/api/v1/clients/acme-corp/health/summary").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let summary = &json["data"];
    assert_eq!(summary["total_checks"], 4);
    assert_eq!(summary["healthy"], 3);
    assert_eq!(summary["warning"], 1);
    assert_eq!(summary["overall"], "warning");
    assert_eq!(summary["missing_check_types"], json!([]));
}

#[tokio::test]
async fn history_rejects_out_of_range_days() {
    let response = get(
        build_test_app(),
        "/api/v1/clients/acme-corp/health/history?days=0",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_PARAMETER");
}

#[tokio::test]
async fn history_rejects_non_numeric_days() {
    let response = get(
        build_test_app(),
        "/api/v1/clients/acme-corp/health/history?days=week",
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn summary_without_history_is_unknown() {
    let response = get(build_test_app(), "/api/v1/clients/globex/health/summary").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["overall"], "unknown");
    assert_eq!(json["data"]["total_checks"], 0);
    assert_eq!(json["data"]["last_check_time"], serde_json::Value::Null);
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

#[tokio::test]
async fn thresholds_list_defaults() {
    let response = get(build_test_app(), "/api/v1/health/thresholds").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let thresholds = json["data"].as_array().unwrap();
    assert_eq!(thresholds.len(), 4);
    assert_eq!(thresholds[0]["check_type"], "cpu");
    assert_eq!(thresholds[0]["value"], 85.0);
    assert_eq!(thresholds[0]["is_default"], true);
}

#[tokio::test]
async fn unknown_route_is_404() {
    let app = build_test_app();
    let request = axum::http::Request::builder()
        .uri("/api/v1/nope")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Readings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn pushed_reading_drives_the_next_check() {
    let app = build_test_app();

    let response = post_json(
        app.clone(),
        "/api/v1/clients/acme-corp/readings",
        json!({ "kind": "utilization", "resource": "cpu", "percent": 97.0 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["client_id"], "acme-corp");
    assert_eq!(json["data"]["kind"], "utilization");
    assert_eq!(json["data"]["percent"], 97.0);
    assert!(json["data"]["recorded_at"].is_string());

    let response = post_json(
        app,
        "/api/v1/clients/acme-corp/health/checks",
        json!({ "check_types": ["cpu"] }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["status"], "critical");
    assert_eq!(json["data"][0]["value"], 97.0);
}

#[tokio::test]
async fn pushed_service_state_is_recorded() {
    let app = build_test_app();

    let response = post_json(
        app.clone(),
        "/api/v1/clients/acme-corp/readings",
        json!({ "kind": "service", "name": "nginx", "state": "down" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = post_json(
        app,
        "/api/v1/clients/acme-corp/health/checks",
        json!({ "check_types": ["service"] }),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["data"][0]["status"], "critical");
}

#[tokio::test]
async fn reading_for_unknown_client_is_404() {
    let response = post_json(
        build_test_app(),
        "/api/v1/clients/ghost/readings",
        json!({ "kind": "utilization", "resource": "disk", "percent": 10.0 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "TARGET_NOT_FOUND");
}

#[tokio::test]
async fn reading_out_of_range_is_rejected() {
    let response = post_json(
        build_test_app(),
        "/api/v1/clients/acme-corp/readings",
        json!({ "kind": "utilization", "resource": "memory", "percent": 120 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "INVALID_PARAMETER");
}

#[tokio::test]
async fn reading_with_unknown_kind_is_bad_request() {
    let response = post_json(
        build_test_app(),
        "/api/v1/clients/acme-corp/readings",
        json!({ "kind": "temperature", "celsius": 71 }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}

// ---------------------------------------------------------------------------
// CORS
// ---------------------------------------------------------------------------

#[tokio::test]
async fn configured_origin_is_allowed_without_credentials() {
    let response = preflight(
        build_test_app(),
        "/api/v1/clients/acme-corp/health/checks",
        ALLOWED_ORIGIN,
    )
    .await;

    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        ALLOWED_ORIGIN
    );
    assert!(!headers.contains_key("access-control-allow-credentials"));
}

#[tokio::test]
async fn unlisted_origin_gets_no_cors_headers() {
    let response = preflight(
        build_test_app(),
        "/api/v1/clients/acme-corp/health/checks",
        "http://localhost:5173",
    )
    .await;

    assert!(!response
        .headers()
        .contains_key("access-control-allow-origin"));
}
