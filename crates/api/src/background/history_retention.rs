//! Periodic cleanup of old health check results.
//!
//! Deletes stored results older than the configured retention window on a
//! fixed interval using `tokio::time::interval`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use msp_monitor::HealthMonitor;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
pub const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600); // 1 hour

/// Run the history retention loop until `cancel` is triggered.
///
/// The first purge happens immediately, then once per `interval`.
pub async fn run(
    monitor: Arc<HealthMonitor>,
    retention_days: i64,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(
        retention_days,
        interval_secs = interval.as_secs(),
        "History retention job started"
    );

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("History retention job stopping");
                break;
            }
            _ = ticker.tick() => {
                let cutoff = Utc::now() - chrono::Duration::days(retention_days);
                match monitor.prune_history_older_than(cutoff).await {
                    Ok(deleted) => {
                        if deleted > 0 {
                            tracing::info!(deleted, "History retention: purged old results");
                        } else {
                            tracing::debug!("History retention: no results to purge");
                        }
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "History retention: cleanup failed");
                    }
                }
            }
        }
    }
}
