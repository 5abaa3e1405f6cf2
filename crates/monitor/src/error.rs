use msp_core::error::CoreError;

/// Batch-level failures surfaced to callers of the health monitor.
///
/// Individual check degradation is never an error; it shows up as an
/// `Unknown` result in the returned set.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MonitorError {
    #[error("Client '{0}' not found")]
    TargetNotFound(String),

    #[error("Invalid check type: '{0}'")]
    InvalidCheckType(String),

    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: &'static str, message: String },

    #[error("Failed to persist check results: {0}")]
    Persistence(String),

    #[error("Client registry unavailable: {0}")]
    Registry(String),

    #[error("Failed to record reading: {0}")]
    Ingest(String),
}

impl MonitorError {
    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::TargetNotFound(_) => "TARGET_NOT_FOUND",
            Self::InvalidCheckType(_) => "INVALID_CHECK_TYPE",
            Self::InvalidParameter { .. } => "INVALID_PARAMETER",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::Registry(_) => "REGISTRY_UNAVAILABLE",
            Self::Ingest(_) => "INGEST_UNAVAILABLE",
        }
    }
}

impl MonitorError {
    /// Map a check-type normalization failure onto the batch error taxonomy.
    pub(crate) fn from_check_types(err: CoreError) -> Self {
        match err {
            CoreError::InvalidCheckType(token) => Self::InvalidCheckType(token),
            other => Self::InvalidParameter {
                name: "check_types",
                message: other.to_string(),
            },
        }
    }
}
