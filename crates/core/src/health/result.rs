//! Check results and status summaries.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::health::check_type::{CheckStatus, CheckType};
use crate::types::{ClientId, Timestamp};

/// One evaluation of one check type against one client.
///
/// Created by the check executor, appended once to history and only ever
/// read afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub client_id: ClientId,
    pub check_type: CheckType,
    pub status: CheckStatus,
    /// Measured percentage. Absent for boolean checks and failed readings.
    pub value: Option<f64>,
    /// Ceiling the value was compared against.
    pub threshold: Option<f64>,
    pub message: String,
    /// Check-specific details (per-service states, failure cause, ...).
    #[serde(default)]
    pub data: serde_json::Value,
    pub checked_at: Timestamp,
}

impl CheckResult {
    /// A result stamped with the current time and an empty detail payload.
    pub fn new(
        client_id: impl Into<ClientId>,
        check_type: CheckType,
        status: CheckStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            check_type,
            status,
            value: None,
            threshold: None,
            message: message.into(),
            data: serde_json::Value::Object(Default::default()),
            checked_at: Utc::now(),
        }
    }

    /// A result that could not be evaluated.
    pub fn unknown(
        client_id: impl Into<ClientId>,
        check_type: CheckType,
        message: impl Into<String>,
    ) -> Self {
        Self::new(client_id, check_type, CheckStatus::Unknown, message)
    }

    pub fn with_measurement(mut self, value: f64, threshold: f64) -> Self {
        self.value = Some(value);
        self.threshold = Some(threshold);
        self
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = data;
        self
    }

    pub fn with_checked_at(mut self, checked_at: Timestamp) -> Self {
        self.checked_at = checked_at;
        self
    }
}

/// Aggregated status rollup for a set of results. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSummary {
    pub client_id: ClientId,
    pub total_checks: usize,
    pub healthy: usize,
    pub warning: usize,
    pub critical: usize,
    pub unknown: usize,
    pub overall: CheckStatus,
    /// Timestamp of the most recent contributing result.
    pub last_check_time: Option<Timestamp>,
    /// Expected check types with no recorded result.
    pub missing_check_types: Vec<CheckType>,
}

impl HealthSummary {
    /// Number of results that reported `status`.
    pub fn count(&self, status: CheckStatus) -> usize {
        match status {
            CheckStatus::Healthy => self.healthy,
            CheckStatus::Warning => self.warning,
            CheckStatus::Critical => self.critical,
            CheckStatus::Unknown => self.unknown,
        }
    }
}
