//! Repository for the `clients` table.

use sqlx::PgPool;

use crate::models::client::{Client, CreateClient, CLIENT_STATUS_ACTIVE};

/// Column list for `clients` queries.
const COLUMNS: &str = "id, name, contact_email, tier, status, created_at, updated_at";

/// Provides query operations for monitored clients.
pub struct ClientRepo;

impl ClientRepo {
    /// Register a new client.
    pub async fn create(pool: &PgPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!(
            "INSERT INTO clients (id, name, contact_email, tier) \
             VALUES ($1, $2, $3, COALESCE($4, 'standard')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(&input.id)
            .bind(&input.name)
            .bind(&input.contact_email)
            .bind(&input.tier)
            .fetch_one(pool)
            .await
    }

    /// Whether an active client with this id exists.
    pub async fn exists_active(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1 AND status = $2)",
        )
        .bind(id)
        .bind(CLIENT_STATUS_ACTIVE)
        .fetch_one(pool)
        .await
    }

    /// Whether any client with this id exists, active or not.
    pub async fn exists(pool: &PgPool, id: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM clients WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// Ids of all active clients, sorted.
    pub async fn list_active_ids(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("SELECT id FROM clients WHERE status = $1 ORDER BY id")
            .bind(CLIENT_STATUS_ACTIVE)
            .fetch_all(pool)
            .await
    }

    /// Change a client's status. Returns `None` if the client does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: &str,
        status: &str,
    ) -> Result<Option<Client>, sqlx::Error> {
        let query = format!(
            "UPDATE clients SET status = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Client>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
