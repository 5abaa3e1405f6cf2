//! Route definitions for client health monitoring.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::health_checks;
use crate::state::AppState;

/// Routes mounted under `/api/v1`.
///
/// ```text
/// POST /clients/{id}/health/checks    -> run_checks
/// GET  /clients/{id}/health/history   -> get_history (?days=N, default 7)
/// GET  /clients/{id}/health/summary   -> get_status_summary
/// POST /clients/{id}/readings         -> record_reading
/// POST /health/checks                 -> run_checks_all
/// GET  /health/thresholds             -> list_thresholds
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/clients/{id}/health/checks",
            post(health_checks::run_checks),
        )
        .route(
            "/clients/{id}/health/history",
            get(health_checks::get_history),
        )
        .route(
            "/clients/{id}/health/summary",
            get(health_checks::get_status_summary),
        )
        .route(
            "/clients/{id}/readings",
            post(health_checks::record_reading),
        )
        .route("/health/checks", post(health_checks::run_checks_all))
        .route("/health/thresholds", get(health_checks::list_thresholds))
}
