//! Handlers for client health monitoring endpoints.
//!
//! Thin adapters over [`HealthMonitor`](msp_monitor::HealthMonitor): decode
//! the request, call one monitor operation, wrap the result in
//! [`DataResponse`].

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use msp_core::health::{CheckResult, EffectiveThreshold, HealthSummary};
use msp_core::types::{ClientId, Timestamp};
use msp_monitor::monitor::DEFAULT_HISTORY_DAYS;
use msp_monitor::{Reading, TargetCheckReport};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for the run-checks endpoints. An empty body runs the default set.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunChecksRequest {
    /// Check type tokens (`cpu`, `memory`, `disk`, `service`, `network`).
    pub check_types: Option<Vec<String>>,
}

/// Query parameters for the history endpoint.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Days of history to return (default: 7).
    pub days: Option<i64>,
}

/// Body for the readings endpoint.
///
/// ```json
/// { "kind": "utilization", "resource": "cpu", "percent": 42.0 }
/// { "kind": "service", "name": "nginx", "state": "down", "recorded_at": "..." }
/// ```
#[derive(Debug, Deserialize)]
pub struct RecordReadingRequest {
    #[serde(flatten)]
    pub reading: Reading,
    /// When the agent took the reading (default: now).
    pub recorded_at: Option<Timestamp>,
}

/// A stored reading, echoed back to the agent.
#[derive(Debug, Serialize)]
pub struct RecordedReading {
    pub client_id: ClientId,
    #[serde(flatten)]
    pub reading: Reading,
    pub recorded_at: Timestamp,
}

fn parse_run_request(body: &Bytes) -> AppResult<RunChecksRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(RunChecksRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/clients/{id}/health/checks
///
/// Run checks for one client and persist the results.
pub async fn run_checks(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    body: Bytes,
) -> AppResult<(StatusCode, Json<DataResponse<Vec<CheckResult>>>)> {
    let request = parse_run_request(&body)?;
    let results = state
        .monitor
        .run_named_checks(&client_id, request.check_types.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: results })))
}

/// POST /api/v1/health/checks
///
/// Run checks for every registered client. Per-client failures are reported
/// inline; the request itself only fails on invalid input or an unavailable
/// registry.
pub async fn run_checks_all(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<DataResponse<Vec<TargetCheckReport>>>> {
    let request = parse_run_request(&body)?;
    let outcomes = state
        .monitor
        .run_named_checks_all(request.check_types.as_deref())
        .await?;
    let reports = outcomes.into_iter().map(TargetCheckReport::from).collect();
    Ok(Json(DataResponse { data: reports }))
}

/// GET /api/v1/clients/{id}/health/history?days=N
pub async fn get_history(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    query: Result<Query<HistoryQuery>, QueryRejection>,
) -> AppResult<Json<DataResponse<Vec<CheckResult>>>> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let days = query.days.unwrap_or(DEFAULT_HISTORY_DAYS);
    let history = state.monitor.get_history(&client_id, days).await?;
    Ok(Json(DataResponse { data: history }))
}

/// GET /api/v1/clients/{id}/health/summary
pub async fn get_status_summary(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
) -> AppResult<Json<DataResponse<HealthSummary>>> {
    let summary = state.monitor.get_status_summary(&client_id).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/health/thresholds
///
/// Effective threshold per percentage-based check type.
pub async fn list_thresholds(
    State(state): State<AppState>,
) -> Json<DataResponse<Vec<EffectiveThreshold>>> {
    Json(DataResponse {
        data: state.monitor.thresholds().effective(),
    })
}

/// POST /api/v1/clients/{id}/readings
///
/// Record a reading pushed by the client's agent. Later checks read it back
/// through the metrics backend.
pub async fn record_reading(
    State(state): State<AppState>,
    Path(client_id): Path<String>,
    body: Result<Json<RecordReadingRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<DataResponse<RecordedReading>>)> {
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let recorded_at = state
        .monitor
        .record_reading(&client_id, &request.reading, request.recorded_at)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RecordedReading {
                client_id,
                reading: request.reading,
                recorded_at,
            },
        }),
    ))
}
