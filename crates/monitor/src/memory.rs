//! In-process implementations of the capability ports.
//!
//! Used by tests and by local demos that run without PostgreSQL. They keep
//! the same ordering and atomicity guarantees as the database adapters.

use std::collections::{BTreeSet, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use msp_core::health::{CheckResult, CheckType, ResourceKind};
use msp_core::types::{ClientId, Timestamp};

use crate::ports::{
    ClientRegistry, HistoryStore, MetricsError, MetricsSource, Reading, ReadingSink,
    RegistryError, ServiceState, StoreError,
};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Append-only history held in a `Vec`; insertion order doubles as the
/// tie-breaker for equal timestamps.
#[derive(Debug, Default)]
pub struct InMemoryHistoryStore {
    entries: RwLock<Vec<CheckResult>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored results across all clients.
    pub fn len(&self) -> usize {
        read(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, result: &CheckResult) -> Result<(), StoreError> {
        write(&self.entries).push(result.clone());
        Ok(())
    }

    /// Single write lock, so a batch lands all at once.
    async fn append_batch(&self, results: &[CheckResult]) -> Result<(), StoreError> {
        write(&self.entries).extend(results.iter().cloned());
        Ok(())
    }

    async fn list(
        &self,
        client_id: &str,
        since: Timestamp,
    ) -> Result<Vec<CheckResult>, StoreError> {
        let entries = read(&self.entries);
        // Walk newest insert first; the stable sort then keeps later inserts
        // ahead of earlier ones that share a timestamp.
        let mut out: Vec<CheckResult> = entries
            .iter()
            .rev()
            .filter(|r| r.client_id == client_id && r.checked_at >= since)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.checked_at.cmp(&a.checked_at));
        Ok(out)
    }

    async fn latest_per_type(&self, client_id: &str) -> Result<Vec<CheckResult>, StoreError> {
        let entries = read(&self.entries);
        let mut latest: HashMap<CheckType, &CheckResult> = HashMap::new();
        for result in entries.iter().filter(|r| r.client_id == client_id) {
            // `>=` so a later insert wins a timestamp tie.
            let newer = latest
                .get(&result.check_type)
                .map_or(true, |current| result.checked_at >= current.checked_at);
            if newer {
                latest.insert(result.check_type, result);
            }
        }
        let mut out: Vec<CheckResult> = latest.into_values().cloned().collect();
        out.sort_by_key(|r| r.check_type);
        Ok(out)
    }

    async fn prune_older_than(&self, cutoff: Timestamp) -> Result<u64, StoreError> {
        let mut entries = write(&self.entries);
        let before = entries.len();
        entries.retain(|r| r.checked_at >= cutoff);
        Ok((before - entries.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    clients: RwLock<BTreeSet<ClientId>>,
}

impl InMemoryRegistry {
    pub fn new<I, S>(clients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ClientId>,
    {
        Self {
            clients: RwLock::new(clients.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
impl ClientRegistry for InMemoryRegistry {
    async fn exists(&self, client_id: &str) -> Result<bool, RegistryError> {
        Ok(read(&self.clients).contains(client_id))
    }

    async fn list_targets(&self) -> Result<Vec<ClientId>, RegistryError> {
        Ok(read(&self.clients).iter().cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Metrics source answering from fixed, settable readings.
#[derive(Debug, Default)]
pub struct StaticMetricsSource {
    utilization: RwLock<HashMap<(ClientId, ResourceKind), f64>>,
    services: RwLock<HashMap<(ClientId, String), ServiceState>>,
}

impl StaticMetricsSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_utilization(&self, client_id: &str, kind: ResourceKind, percent: f64) {
        write(&self.utilization).insert((client_id.to_string(), kind), percent);
    }

    pub fn set_service_state(&self, client_id: &str, service_name: &str, state: ServiceState) {
        write(&self.services).insert((client_id.to_string(), service_name.to_string()), state);
    }

    fn knows(&self, client_id: &str) -> bool {
        read(&self.utilization).keys().any(|(c, _)| c == client_id)
            || read(&self.services).keys().any(|(c, _)| c == client_id)
    }
}

#[async_trait]
impl MetricsSource for StaticMetricsSource {
    async fn read_utilization(
        &self,
        client_id: &str,
        kind: ResourceKind,
    ) -> Result<f64, MetricsError> {
        if let Some(value) = read(&self.utilization).get(&(client_id.to_string(), kind)) {
            return Ok(*value);
        }
        if self.knows(client_id) {
            Err(MetricsError::NoReading(format!("no {kind} reading for '{client_id}'")))
        } else {
            Err(MetricsError::UnknownTarget(client_id.to_string()))
        }
    }

    async fn read_service_state(
        &self,
        client_id: &str,
        service_name: &str,
    ) -> Result<ServiceState, MetricsError> {
        let key = (client_id.to_string(), service_name.to_string());
        if let Some(state) = read(&self.services).get(&key) {
            return Ok(*state);
        }
        if self.knows(client_id) {
            Err(MetricsError::NoReading(format!(
                "no state for service '{service_name}' on '{client_id}'"
            )))
        } else {
            Err(MetricsError::UnknownTarget(client_id.to_string()))
        }
    }
}

/// Keeps only the latest value; `recorded_at` is not retained.
#[async_trait]
impl ReadingSink for StaticMetricsSource {
    async fn record(
        &self,
        client_id: &str,
        reading: &Reading,
        _recorded_at: Timestamp,
    ) -> Result<(), MetricsError> {
        match reading {
            Reading::Utilization { resource, percent } => {
                self.set_utilization(client_id, *resource, *percent)
            }
            Reading::Service { name, state } => self.set_service_state(client_id, name, *state),
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
