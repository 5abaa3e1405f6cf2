use async_trait::async_trait;
use msp_core::health::CheckResult;
use msp_core::types::Timestamp;
use msp_monitor::{HistoryStore, StoreError};
use sqlx::PgPool;

use crate::models::health_check::{CreateHealthCheck, HealthCheckRow};
use crate::repositories::HealthCheckRepo;

/// History store over `health_check_results`.
#[derive(Clone)]
pub struct PgHistoryStore {
    pool: PgPool,
}

impl PgHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn into_results(rows: Vec<HealthCheckRow>) -> Result<Vec<CheckResult>, StoreError> {
    rows.into_iter()
        .map(|row| {
            let id = row.id;
            row.into_result()
                .map_err(|e| StoreError::Corrupt(format!("row {id}: {e}")))
        })
        .collect()
}

#[async_trait]
impl HistoryStore for PgHistoryStore {
    async fn append(&self, result: &CheckResult) -> Result<(), StoreError> {
        self.append_batch(std::slice::from_ref(result)).await
    }

    async fn append_batch(&self, results: &[CheckResult]) -> Result<(), StoreError> {
        let rows: Vec<CreateHealthCheck> = results.iter().map(CreateHealthCheck::from).collect();
        HealthCheckRepo::insert_batch(&self.pool, &rows)
            .await
            .map_err(unavailable)
    }

    async fn list(
        &self,
        client_id: &str,
        since: Timestamp,
    ) -> Result<Vec<CheckResult>, StoreError> {
        let rows = HealthCheckRepo::list_for_client(&self.pool, client_id, since)
            .await
            .map_err(unavailable)?;
        into_results(rows)
    }

    async fn latest_per_type(&self, client_id: &str) -> Result<Vec<CheckResult>, StoreError> {
        let rows = HealthCheckRepo::latest_per_type(&self.pool, client_id)
            .await
            .map_err(unavailable)?;
        into_results(rows)
    }

    async fn prune_older_than(&self, cutoff: Timestamp) -> Result<u64, StoreError> {
        HealthCheckRepo::delete_older_than(&self.pool, cutoff)
            .await
            .map_err(unavailable)
    }
}
