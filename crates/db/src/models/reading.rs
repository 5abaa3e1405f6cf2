//! Raw readings pushed by client agents, consumed by the local metrics backend.

use msp_core::types::{ClientId, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Reading kind for service up/down rows; the others reuse the resource names.
pub const READING_KIND_SERVICE: &str = "service";

/// A row from the `client_readings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClientReading {
    pub id: DbId,
    pub client_id: ClientId,
    pub kind: String,
    pub service_name: Option<String>,
    pub value: Option<f64>,
    pub is_up: Option<bool>,
    pub recorded_at: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for recording a reading.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateReading {
    pub kind: String,
    pub service_name: Option<String>,
    pub value: Option<f64>,
    pub is_up: Option<bool>,
    pub recorded_at: Timestamp,
}

impl CreateReading {
    /// A utilization percentage for `kind` (`cpu`, `memory`, `disk`, `network`).
    pub fn utilization(kind: &str, value: f64, recorded_at: Timestamp) -> Self {
        Self {
            kind: kind.to_string(),
            service_name: None,
            value: Some(value),
            is_up: None,
            recorded_at,
        }
    }

    /// The up/down state of a named service.
    pub fn service(service_name: &str, is_up: bool, recorded_at: Timestamp) -> Self {
        Self {
            kind: READING_KIND_SERVICE.to_string(),
            service_name: Some(service_name.to_string()),
            value: None,
            is_up: Some(is_up),
            recorded_at,
        }
    }
}
