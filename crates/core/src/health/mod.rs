//! Health check domain logic.
//!
//! - [`check_type`]: the closed check taxonomy, status severity ordering and
//!   token normalization.
//! - [`thresholds`]: the threshold policy and percentage classification.
//! - [`result`]: check results and summaries.
//! - [`summary`]: the summary aggregator.

pub mod check_type;
pub mod result;
pub mod summary;
pub mod thresholds;

pub use check_type::{normalize_check_types, CheckStatus, CheckType, ResourceKind};
pub use result::{CheckResult, HealthSummary};
pub use summary::{summarize, summarize_latest};
pub use thresholds::{
    classify_percentage, is_valid_percentage, EffectiveThreshold, ThresholdSet, ESCALATION_MARGIN,
};
