//! Health monitor facade.
//!
//! Operations:
//!
//! | Operation                | Persists | Errors                                           |
//! |--------------------------|----------|--------------------------------------------------|
//! | [`run_checks`]           | yes      | invalid input, unknown client, registry, store   |
//! | [`run_checks_all`]       | yes      | invalid input, registry (per-client errors kept) |
//! | [`get_history`]          | no       | invalid `days`, unknown client, registry, store  |
//! | [`get_status_summary`]   | no       | unknown client, registry, store                  |
//! | [`record_reading`]       | reading  | invalid reading, unknown client, registry, sink  |
//!
//! Input is validated before the registry is consulted, and the registry is
//! consulted before any metrics capability call.
//!
//! [`run_checks`]: HealthMonitor::run_checks
//! [`run_checks_all`]: HealthMonitor::run_checks_all
//! [`get_history`]: HealthMonitor::get_history
//! [`get_status_summary`]: HealthMonitor::get_status_summary
//! [`record_reading`]: HealthMonitor::record_reading

use std::sync::Arc;

use chrono::{Duration, Utc};
use futures::future::join_all;
use msp_core::health::{
    is_valid_percentage, normalize_check_types, summarize_latest, CheckResult, CheckStatus,
    CheckType, HealthSummary, ThresholdSet,
};
use msp_core::types::{ClientId, Timestamp};
use serde::Serialize;

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::executor::CheckExecutor;
use crate::ports::{ClientRegistry, HistoryStore, MetricsSource, Reading, ReadingSink};

/// Largest accepted history window, in days.
pub const MAX_HISTORY_DAYS: i64 = 365;

/// Default history window, in days.
pub const DEFAULT_HISTORY_DAYS: i64 = 7;

/// How far ahead of the server clock a reading's timestamp may be, in seconds.
pub const MAX_READING_CLOCK_SKEW_SECS: i64 = 300;

/// Outcome of one client inside a [`HealthMonitor::run_checks_all`] sweep.
#[derive(Debug, Clone)]
pub struct TargetCheckOutcome {
    pub client_id: ClientId,
    pub outcome: Result<Vec<CheckResult>, MonitorError>,
}

/// Serializable view of a [`TargetCheckOutcome`].
#[derive(Debug, Serialize)]
pub struct TargetCheckReport {
    pub client_id: ClientId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<CheckResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<TargetCheckOutcome> for TargetCheckReport {
    fn from(outcome: TargetCheckOutcome) -> Self {
        match outcome.outcome {
            Ok(results) => Self {
                client_id: outcome.client_id,
                results: Some(results),
                error: None,
            },
            Err(e) => Self {
                client_id: outcome.client_id,
                results: None,
                error: Some(e.to_string()),
            },
        }
    }
}

pub struct HealthMonitor {
    registry: Arc<dyn ClientRegistry>,
    history: Arc<dyn HistoryStore>,
    executor: CheckExecutor,
    readings: Option<Arc<dyn ReadingSink>>,
}

impl HealthMonitor {
    pub fn new(
        registry: Arc<dyn ClientRegistry>,
        history: Arc<dyn HistoryStore>,
        executor: CheckExecutor,
    ) -> Self {
        Self {
            registry,
            history,
            executor,
            readings: None,
        }
    }

    /// Accept pushed readings and record them in `sink`.
    pub fn with_reading_sink(mut self, sink: Arc<dyn ReadingSink>) -> Self {
        self.readings = Some(sink);
        self
    }

    /// Wire a monitor from its capabilities and a loaded configuration.
    pub fn from_config(
        registry: Arc<dyn ClientRegistry>,
        history: Arc<dyn HistoryStore>,
        metrics: Arc<dyn MetricsSource>,
        config: &MonitorConfig,
    ) -> Self {
        let executor = CheckExecutor::new(
            metrics,
            config.thresholds.clone(),
            config.services.clone(),
            config.check_timeout,
        );
        Self::new(registry, history, executor)
    }

    /// Thresholds currently in force.
    pub fn thresholds(&self) -> &ThresholdSet {
        self.executor.thresholds()
    }

    /// All monitorable client ids.
    pub async fn list_targets(&self) -> Result<Vec<ClientId>, MonitorError> {
        self.registry
            .list_targets()
            .await
            .map_err(|e| MonitorError::Registry(e.to_string()))
    }

    /// Run checks for one client and persist the results as one batch.
    ///
    /// `None` runs the default set (CPU, MEMORY, DISK, SERVICE). An explicit
    /// empty list is rejected. Results come back in request order with
    /// duplicates removed. If the batch cannot be persisted nothing is
    /// returned.
    pub async fn run_checks(
        &self,
        client_id: &str,
        check_types: Option<&[CheckType]>,
    ) -> Result<Vec<CheckResult>, MonitorError> {
        let check_types = resolve_check_types(check_types)?;
        self.ensure_target(client_id).await?;
        self.execute(client_id, &check_types).await
    }

    /// Same as [`run_checks`](Self::run_checks) but takes raw check type
    /// tokens, as they arrive from callers.
    pub async fn run_named_checks<S: AsRef<str>>(
        &self,
        client_id: &str,
        check_types: Option<&[S]>,
    ) -> Result<Vec<CheckResult>, MonitorError> {
        let parsed = parse_tokens(check_types)?;
        self.run_checks(client_id, parsed.as_deref()).await
    }

    /// Run checks for every client the registry knows.
    ///
    /// Clients run concurrently and come back in registry order. A failure
    /// for one client is recorded in its outcome and does not affect the
    /// others.
    pub async fn run_checks_all(
        &self,
        check_types: Option<&[CheckType]>,
    ) -> Result<Vec<TargetCheckOutcome>, MonitorError> {
        let check_types = resolve_check_types(check_types)?;
        let targets = self.list_targets().await?;

        let check_types = &check_types;
        let outcomes = join_all(targets.into_iter().map(|client_id| async move {
            let outcome = self.execute(&client_id, check_types).await;
            if let Err(e) = &outcome {
                tracing::error!(
                    client_id = %client_id,
                    error = %e,
                    "Health check sweep failed for client",
                );
            }
            TargetCheckOutcome { client_id, outcome }
        }))
        .await;

        tracing::info!(targets = outcomes.len(), "Health check sweep completed");
        Ok(outcomes)
    }

    /// Token-based variant of [`run_checks_all`](Self::run_checks_all).
    pub async fn run_named_checks_all<S: AsRef<str>>(
        &self,
        check_types: Option<&[S]>,
    ) -> Result<Vec<TargetCheckOutcome>, MonitorError> {
        let parsed = parse_tokens(check_types)?;
        self.run_checks_all(parsed.as_deref()).await
    }

    /// Stored results from the last `days` days, most recent first.
    pub async fn get_history(
        &self,
        client_id: &str,
        days: i64,
    ) -> Result<Vec<CheckResult>, MonitorError> {
        if !(1..=MAX_HISTORY_DAYS).contains(&days) {
            return Err(MonitorError::InvalidParameter {
                name: "days",
                message: format!("must be between 1 and {MAX_HISTORY_DAYS}, got {days}"),
            });
        }
        self.ensure_target(client_id).await?;

        let since = Utc::now() - Duration::days(days);
        self.history
            .list(client_id, since)
            .await
            .map_err(|e| MonitorError::Persistence(e.to_string()))
    }

    /// Roll the latest stored result per check type into a summary.
    ///
    /// Read-only: no checks are run.
    pub async fn get_status_summary(&self, client_id: &str) -> Result<HealthSummary, MonitorError> {
        self.ensure_target(client_id).await?;

        let latest = self
            .history
            .latest_per_type(client_id)
            .await
            .map_err(|e| MonitorError::Persistence(e.to_string()))?;

        Ok(summarize_latest(client_id, &latest, &CheckType::DEFAULT_SET))
    }

    /// Delete stored results older than `cutoff`.
    pub async fn prune_history_older_than(&self, cutoff: Timestamp) -> Result<u64, MonitorError> {
        self.history
            .prune_older_than(cutoff)
            .await
            .map_err(|e| MonitorError::Persistence(e.to_string()))
    }

    /// Record a reading pushed by a client agent.
    ///
    /// `recorded_at` defaults to now and may not lie more than
    /// [`MAX_READING_CLOCK_SKEW_SECS`] in the future. Returns the timestamp the
    /// reading was stored under.
    pub async fn record_reading(
        &self,
        client_id: &str,
        reading: &Reading,
        recorded_at: Option<Timestamp>,
    ) -> Result<Timestamp, MonitorError> {
        let now = Utc::now();
        let recorded_at = recorded_at.unwrap_or(now);
        validate_reading(reading, recorded_at, now)?;

        let Some(sink) = &self.readings else {
            return Err(MonitorError::Ingest("no reading sink is configured".to_string()));
        };
        self.ensure_target(client_id).await?;

        sink.record(client_id, reading, recorded_at)
            .await
            .map_err(|e| MonitorError::Ingest(e.to_string()))?;

        tracing::debug!(client_id = %client_id, reading = ?reading, "Reading recorded");
        Ok(recorded_at)
    }

    async fn ensure_target(&self, client_id: &str) -> Result<(), MonitorError> {
        let exists = self
            .registry
            .exists(client_id)
            .await
            .map_err(|e| MonitorError::Registry(e.to_string()))?;
        if exists {
            Ok(())
        } else {
            Err(MonitorError::TargetNotFound(client_id.to_string()))
        }
    }

    async fn execute(
        &self,
        client_id: &str,
        check_types: &[CheckType],
    ) -> Result<Vec<CheckResult>, MonitorError> {
        let results = join_all(
            check_types
                .iter()
                .map(|ct| self.executor.evaluate(client_id, *ct)),
        )
        .await;

        if let Err(e) = self.history.append_batch(&results).await {
            tracing::error!(
                client_id = %client_id,
                error = %e,
                "Failed to persist health check results",
            );
            return Err(MonitorError::Persistence(e.to_string()));
        }

        let count = |status: CheckStatus| results.iter().filter(|r| r.status == status).count();
        tracing::info!(
            client_id = %client_id,
            total = results.len(),
            healthy = count(CheckStatus::Healthy),
            warning = count(CheckStatus::Warning),
            critical = count(CheckStatus::Critical),
            unknown = count(CheckStatus::Unknown),
            "Health checks completed",
        );

        Ok(results)
    }
}

/// Apply the default set and reject an explicit empty list.
fn resolve_check_types(check_types: Option<&[CheckType]>) -> Result<Vec<CheckType>, MonitorError> {
    match check_types {
        None => Ok(CheckType::DEFAULT_SET.to_vec()),
        Some([]) => Err(MonitorError::InvalidParameter {
            name: "check_types",
            message: "must not be empty".to_string(),
        }),
        Some(types) => {
            let mut out = Vec::with_capacity(types.len());
            for ct in types {
                if !out.contains(ct) {
                    out.push(*ct);
                }
            }
            Ok(out)
        }
    }
}

fn validate_reading(
    reading: &Reading,
    recorded_at: Timestamp,
    now: Timestamp,
) -> Result<(), MonitorError> {
    match reading {
        Reading::Utilization { percent, .. } if !is_valid_percentage(*percent) => {
            return Err(MonitorError::InvalidParameter {
                name: "percent",
                message: format!("must be between 0 and 100, got {percent}"),
            });
        }
        Reading::Service { name, .. } if name.trim().is_empty() => {
            return Err(MonitorError::InvalidParameter {
                name: "name",
                message: "must not be blank".to_string(),
            });
        }
        _ => {}
    }
    if recorded_at > now + Duration::seconds(MAX_READING_CLOCK_SKEW_SECS) {
        return Err(MonitorError::InvalidParameter {
            name: "recorded_at",
            message: format!("{recorded_at} is in the future"),
        });
    }
    Ok(())
}

fn parse_tokens<S: AsRef<str>>(
    tokens: Option<&[S]>,
) -> Result<Option<Vec<CheckType>>, MonitorError> {
    tokens
        .map(|tokens| normalize_check_types(tokens).map_err(MonitorError::from_check_types))
        .transpose()
}
