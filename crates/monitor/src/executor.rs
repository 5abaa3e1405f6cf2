//! Check executor.
//!
//! Turns capability readings into [`CheckResult`]s via the threshold policy.
//! Evaluation never fails: an unreachable source, an unknown client, an
//! invalid reading or a timeout all degrade to an `Unknown` result. The
//! executor does not persist anything.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use msp_core::health::{
    classify_percentage, CheckResult, CheckStatus, CheckType, ResourceKind, ThresholdSet,
};
use serde_json::json;

use crate::ports::{MetricsError, MetricsSource, ServiceState};

/// Default per-check capability timeout.
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

pub struct CheckExecutor {
    metrics: Arc<dyn MetricsSource>,
    thresholds: ThresholdSet,
    services: Vec<String>,
    timeout: Duration,
}

impl CheckExecutor {
    /// `services` are the service names the SERVICE check asks about for
    /// every client.
    pub fn new(
        metrics: Arc<dyn MetricsSource>,
        thresholds: ThresholdSet,
        services: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            metrics,
            thresholds,
            services,
            timeout,
        }
    }

    pub fn thresholds(&self) -> &ThresholdSet {
        &self.thresholds
    }

    /// Evaluate one check type against one client.
    ///
    /// A capability call that does not answer within the configured timeout
    /// is abandoned and the check reports `Unknown`.
    pub async fn evaluate(&self, client_id: &str, check_type: CheckType) -> CheckResult {
        let evaluation = self.evaluate_untimed(client_id, check_type);
        match tokio::time::timeout(self.timeout, evaluation).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                tracing::warn!(
                    client_id = %client_id,
                    check_type = %check_type,
                    timeout_ms,
                    "Health check timed out",
                );
                CheckResult::unknown(
                    client_id,
                    check_type,
                    format!("{} check timed out after {timeout_ms}ms", check_type.label()),
                )
                .with_data(json!({ "cause": "timeout", "timeout_ms": timeout_ms }))
            }
        }
    }

    async fn evaluate_untimed(&self, client_id: &str, check_type: CheckType) -> CheckResult {
        match check_type.resource_kind() {
            Some(kind) => self.evaluate_utilization(client_id, check_type, kind).await,
            None => self.evaluate_services(client_id).await,
        }
    }

    /// CPU / MEMORY / DISK / NETWORK: compare a percentage against the ceiling.
    async fn evaluate_utilization(
        &self,
        client_id: &str,
        check_type: CheckType,
        kind: ResourceKind,
    ) -> CheckResult {
        let label = check_type.label();

        let Some(threshold) = self.thresholds.resolve(check_type) else {
            return CheckResult::unknown(
                client_id,
                check_type,
                format!("No threshold defined for {label} checks"),
            );
        };

        let value = match self.metrics.read_utilization(client_id, kind).await {
            Ok(value) => value,
            Err(e) => return degraded(client_id, check_type, &e),
        };

        let status = classify_percentage(value, threshold);
        if status == CheckStatus::Unknown {
            tracing::warn!(
                client_id = %client_id,
                check_type = %check_type,
                value,
                "Metrics source returned an invalid percentage",
            );
            return CheckResult::unknown(
                client_id,
                check_type,
                format!("{label} reading {value} is not a valid percentage"),
            )
            .with_data(json!({ "cause": "invalid_reading" }));
        }

        CheckResult::new(
            client_id,
            check_type,
            status,
            format!("{label} usage: {value:.1}% (threshold {threshold}%)"),
        )
        .with_measurement(value, threshold)
    }

    /// SERVICE: ask for every configured service concurrently.
    ///
    /// Any service down makes the check `Critical`; otherwise any unreadable
    /// service (or none configured) makes it `Unknown`.
    async fn evaluate_services(&self, client_id: &str) -> CheckResult {
        let check_type = CheckType::Service;

        if self.services.is_empty() {
            return CheckResult::unknown(
                client_id,
                check_type,
                "No services configured for monitoring",
            )
            .with_data(json!({ "cause": "no_services_configured" }));
        }

        let reads = join_all(self.services.iter().map(|name| async move {
            let state = self.metrics.read_service_state(client_id, name).await;
            (name.as_str(), state)
        }))
        .await;

        let mut states = serde_json::Map::new();
        let mut down = Vec::new();
        let mut unreadable = Vec::new();

        for (name, state) in reads {
            match state {
                Ok(ServiceState::Up) => {
                    states.insert(name.to_string(), json!(ServiceState::Up.as_str()));
                }
                Ok(ServiceState::Down) => {
                    states.insert(name.to_string(), json!(ServiceState::Down.as_str()));
                    down.push(name);
                }
                Err(e) => {
                    tracing::warn!(
                        client_id = %client_id,
                        service = %name,
                        error = %e,
                        "Service state unavailable",
                    );
                    states.insert(name.to_string(), json!("unknown"));
                    unreadable.push(name);
                }
            }
        }

        let (status, message) = if !down.is_empty() {
            (
                CheckStatus::Critical,
                format!("Services down: {}", down.join(", ")),
            )
        } else if !unreadable.is_empty() {
            (
                CheckStatus::Unknown,
                format!("Service state unavailable: {}", unreadable.join(", ")),
            )
        } else {
            (
                CheckStatus::Healthy,
                format!("All {} services running", self.services.len()),
            )
        };

        CheckResult::new(client_id, check_type, status, message)
            .with_data(json!({ "services": states }))
    }
}

/// Build the `Unknown` result for a failed capability call.
fn degraded(client_id: &str, check_type: CheckType, err: &MetricsError) -> CheckResult {
    tracing::warn!(
        client_id = %client_id,
        check_type = %check_type,
        error = %err,
        "Health check degraded to unknown",
    );
    CheckResult::unknown(
        client_id,
        check_type,
        format!("{} reading unavailable: {err}", check_type.label()),
    )
    .with_data(json!({ "cause": err.cause() }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
