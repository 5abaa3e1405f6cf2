use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use msp_monitor::MonitorError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`MonitorError`] and adds HTTP-specific variants. Implements
/// [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An error from the health monitor.
    #[error(transparent)]
    Monitor(#[from] MonitorError),

    /// A malformed request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Monitor(err) => classify_monitor_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Map a monitor error onto an HTTP status, error code and message.
///
/// Persistence, registry and ingest failures are logged in full and answered
/// with a sanitized message.
fn classify_monitor_error(err: &MonitorError) -> (StatusCode, &'static str, String) {
    match err {
        MonitorError::TargetNotFound(_) => (StatusCode::NOT_FOUND, err.code(), err.to_string()),
        MonitorError::InvalidCheckType(_) | MonitorError::InvalidParameter { .. } => {
            (StatusCode::BAD_REQUEST, err.code(), err.to_string())
        }
        MonitorError::Persistence(detail) => {
            tracing::error!(error = %detail, "Health history persistence error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                err.code(),
                "Health check history is unavailable".to_string(),
            )
        }
        MonitorError::Registry(detail) => {
            tracing::error!(error = %detail, "Client registry error");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                err.code(),
                "Client registry is unavailable".to_string(),
            )
        }
        MonitorError::Ingest(detail) => {
            tracing::error!(error = %detail, "Reading ingest error");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                err.code(),
                "Reading ingest is unavailable".to_string(),
            )
        }
    }
}
