//! Repository for the `health_check_results` table (append-only history).

use msp_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::health_check::{CreateHealthCheck, HealthCheckRow};

/// Column list for `health_check_results` SELECT queries.
const COLUMNS: &str = "\
    id, client_id, check_type, status, message, \
    value, threshold, data, checked_at, created_at";

/// Column list for INSERT statements (excludes `id` and `created_at`).
const INSERT_COLUMNS: &str = "\
    client_id, check_type, status, message, \
    value, threshold, data, checked_at";

/// Provides query operations for health check history.
pub struct HealthCheckRepo;

impl HealthCheckRepo {
    /// Insert a batch of results in one transaction.
    ///
    /// Rows are inserted in slice order, so later entries get higher ids.
    pub async fn insert_batch(
        pool: &PgPool,
        checks: &[CreateHealthCheck],
    ) -> Result<(), sqlx::Error> {
        if checks.is_empty() {
            return Ok(());
        }

        let query = format!(
            "INSERT INTO health_check_results ({INSERT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        );

        let mut tx = pool.begin().await?;
        for check in checks {
            sqlx::query(&query)
                .bind(&check.client_id)
                .bind(check.check_type)
                .bind(check.status)
                .bind(&check.message)
                .bind(check.value)
                .bind(check.threshold)
                .bind(&check.data)
                .bind(check.checked_at)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Results for a client since `since`, newest first.
    ///
    /// Ties on `checked_at` list the later insert first.
    pub async fn list_for_client(
        pool: &PgPool,
        client_id: &str,
        since: Timestamp,
    ) -> Result<Vec<HealthCheckRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM health_check_results \
             WHERE client_id = $1 AND checked_at >= $2 \
             ORDER BY checked_at DESC, id DESC"
        );
        sqlx::query_as::<_, HealthCheckRow>(&query)
            .bind(client_id)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// The most recent result per check type for a client.
    pub async fn latest_per_type(
        pool: &PgPool,
        client_id: &str,
    ) -> Result<Vec<HealthCheckRow>, sqlx::Error> {
        let query = format!(
            "SELECT DISTINCT ON (check_type) {COLUMNS} \
             FROM health_check_results \
             WHERE client_id = $1 \
             ORDER BY check_type, checked_at DESC, id DESC"
        );
        sqlx::query_as::<_, HealthCheckRow>(&query)
            .bind(client_id)
            .fetch_all(pool)
            .await
    }

    /// Delete results older than the given cutoff timestamp.
    ///
    /// Returns the number of rows deleted.
    pub async fn delete_older_than(pool: &PgPool, cutoff: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM health_check_results WHERE checked_at < $1")
            .bind(cutoff)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
