//! Capability interfaces the monitor depends on.
//!
//! - [`MetricsSource`]: raw utilization and service-state readings.
//! - [`ReadingSink`]: where readings pushed by client agents are recorded.
//! - [`ClientRegistry`]: which clients exist.
//! - [`HistoryStore`]: append-only result history, always scoped to one client.

use async_trait::async_trait;
use msp_core::health::{CheckResult, ResourceKind};
use msp_core::types::{ClientId, Timestamp};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Up/down state of a monitored service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    Up,
    Down,
}

impl ServiceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }
}

/// Why the metrics source could not produce a reading.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MetricsError {
    #[error("metrics source unreachable: {0}")]
    Unreachable(String),

    #[error("client '{0}' is unknown to the metrics source")]
    UnknownTarget(String),

    #[error("no reading available: {0}")]
    NoReading(String),
}

impl MetricsError {
    /// Short machine-readable cause, recorded in the result detail payload.
    pub fn cause(&self) -> &'static str {
        match self {
            Self::Unreachable(_) => "unreachable",
            Self::UnknownTarget(_) => "unknown_target",
            Self::NoReading(_) => "no_reading",
        }
    }
}

#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Current utilization of `kind` on the client, as a percentage.
    async fn read_utilization(
        &self,
        client_id: &str,
        kind: ResourceKind,
    ) -> Result<f64, MetricsError>;

    /// Current state of the named service on the client.
    async fn read_service_state(
        &self,
        client_id: &str,
        service_name: &str,
    ) -> Result<ServiceState, MetricsError>;
}

/// A raw reading pushed by a client agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Reading {
    /// Utilization of one resource, as a percentage.
    Utilization { resource: ResourceKind, percent: f64 },
    /// Up/down state of a named service.
    Service { name: String, state: ServiceState },
}

#[async_trait]
pub trait ReadingSink: Send + Sync {
    /// Record `reading` for the client as of `recorded_at`.
    async fn record(
        &self,
        client_id: &str,
        reading: &Reading,
        recorded_at: Timestamp,
    ) -> Result<(), MetricsError>;
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, thiserror::Error)]
pub enum RegistryError {
    #[error("client registry unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ClientRegistry: Send + Sync {
    async fn exists(&self, client_id: &str) -> Result<bool, RegistryError>;

    /// All monitorable client ids, sorted.
    async fn list_targets(&self) -> Result<Vec<ClientId>, RegistryError>;
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("history store unavailable: {0}")]
    Unavailable(String),

    #[error("stored check result is invalid: {0}")]
    Corrupt(String),
}

#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn append(&self, result: &CheckResult) -> Result<(), StoreError>;

    /// Append a whole batch.
    ///
    /// The default appends one by one. Stores that can should override this
    /// so a failed batch leaves nothing behind.
    async fn append_batch(&self, results: &[CheckResult]) -> Result<(), StoreError> {
        for result in results {
            self.append(result).await?;
        }
        Ok(())
    }

    /// Results for one client with `checked_at >= since`, most recent first.
    /// Equal timestamps list the later insert first.
    async fn list(
        &self,
        client_id: &str,
        since: Timestamp,
    ) -> Result<Vec<CheckResult>, StoreError>;

    /// The most recent result per check type for one client.
    async fn latest_per_type(&self, client_id: &str) -> Result<Vec<CheckResult>, StoreError>;

    /// Delete results older than `cutoff`, returning how many were removed.
    async fn prune_older_than(&self, cutoff: Timestamp) -> Result<u64, StoreError>;
}
