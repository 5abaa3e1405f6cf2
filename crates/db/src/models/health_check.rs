//! Persisted health check results.

use msp_core::error::CoreError;
use msp_core::health::{CheckResult, CheckStatus, CheckType};
use msp_core::types::{ClientId, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `health_check_results` table (append-only).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct HealthCheckRow {
    pub id: DbId,
    pub client_id: ClientId,
    pub check_type: String,
    pub status: String,
    pub message: String,
    pub value: Option<f64>,
    pub threshold: Option<f64>,
    pub data: serde_json::Value,
    pub checked_at: Timestamp,
    pub created_at: Timestamp,
}

impl HealthCheckRow {
    /// Convert back into the domain result, rejecting unknown vocabulary.
    pub fn into_result(self) -> Result<CheckResult, CoreError> {
        let check_type: CheckType = self.check_type.parse()?;
        let status = CheckStatus::from_str_value(&self.status)?;
        Ok(CheckResult {
            client_id: self.client_id,
            check_type,
            status,
            value: self.value,
            threshold: self.threshold,
            message: self.message,
            data: self.data,
            checked_at: self.checked_at,
        })
    }
}

/// DTO for inserting a result row.
#[derive(Debug, Clone)]
pub struct CreateHealthCheck {
    pub client_id: ClientId,
    pub check_type: &'static str,
    pub status: &'static str,
    pub message: String,
    pub value: Option<f64>,
    pub threshold: Option<f64>,
    pub data: serde_json::Value,
    pub checked_at: Timestamp,
}

impl From<&CheckResult> for CreateHealthCheck {
    fn from(result: &CheckResult) -> Self {
        Self {
            client_id: result.client_id.clone(),
            check_type: result.check_type.as_str(),
            status: result.status.as_str(),
            message: result.message.clone(),
            value: result.value,
            threshold: result.threshold,
            data: result.data.clone(),
            checked_at: result.checked_at,
        }
    }
}
