//! Monitored client models.

use msp_core::types::{ClientId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Client status: eligible for monitoring.
pub const CLIENT_STATUS_ACTIVE: &str = "active";
/// Client status: kept for history, excluded from monitoring.
pub const CLIENT_STATUS_INACTIVE: &str = "inactive";

/// A row from the `clients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub contact_email: Option<String>,
    pub tier: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for registering a client.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClient {
    pub id: ClientId,
    pub name: String,
    pub contact_email: Option<String>,
    /// Defaults to `standard`.
    pub tier: Option<String>,
}
