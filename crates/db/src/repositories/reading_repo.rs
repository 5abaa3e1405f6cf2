//! Repository for the `client_readings` table.

use sqlx::PgPool;

use crate::models::reading::{ClientReading, CreateReading, READING_KIND_SERVICE};

/// Column list for `client_readings` SELECT queries.
const COLUMNS: &str = "\
    id, client_id, kind, service_name, value, is_up, recorded_at, created_at";

/// Provides query operations for raw client readings.
pub struct ReadingRepo;

impl ReadingRepo {
    /// Record one reading for a client.
    pub async fn insert(
        pool: &PgPool,
        client_id: &str,
        reading: &CreateReading,
    ) -> Result<ClientReading, sqlx::Error> {
        let query = format!(
            "INSERT INTO client_readings \
                 (client_id, kind, service_name, value, is_up, recorded_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClientReading>(&query)
            .bind(client_id)
            .bind(&reading.kind)
            .bind(&reading.service_name)
            .bind(reading.value)
            .bind(reading.is_up)
            .bind(reading.recorded_at)
            .fetch_one(pool)
            .await
    }

    /// The most recent utilization reading of `kind` for a client.
    pub async fn latest_utilization(
        pool: &PgPool,
        client_id: &str,
        kind: &str,
    ) -> Result<Option<ClientReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM client_readings \
             WHERE client_id = $1 AND kind = $2 \
             ORDER BY recorded_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, ClientReading>(&query)
            .bind(client_id)
            .bind(kind)
            .fetch_optional(pool)
            .await
    }

    /// The most recent state reading for a named service on a client.
    pub async fn latest_service_state(
        pool: &PgPool,
        client_id: &str,
        service_name: &str,
    ) -> Result<Option<ClientReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM client_readings \
             WHERE client_id = $1 AND kind = $2 AND service_name = $3 \
             ORDER BY recorded_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, ClientReading>(&query)
            .bind(client_id)
            .bind(READING_KIND_SERVICE)
            .bind(service_name)
            .fetch_optional(pool)
            .await
    }
}
