use std::sync::Arc;

use msp_monitor::HealthMonitor;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone; everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Health monitor wired to the configured capabilities.
    pub monitor: Arc<HealthMonitor>,
}
