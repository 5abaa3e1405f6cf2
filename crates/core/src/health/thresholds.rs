//! Threshold policy and percentage classification.
//!
//! Pure logic. The caller builds a [`ThresholdSet`] once from configuration
//! and passes it in; nothing here reads ambient state.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::CoreError;
use crate::health::check_type::{CheckStatus, CheckType};

/// Points above the threshold at which a reading escalates from `Warning`
/// to `Critical`.
pub const ESCALATION_MARGIN: f64 = 10.0;

pub const DEFAULT_CPU_PERCENT: f64 = 85.0;
pub const DEFAULT_MEMORY_PERCENT: f64 = 90.0;
pub const DEFAULT_DISK_PERCENT: f64 = 85.0;
pub const DEFAULT_NETWORK_PERCENT: f64 = 80.0;

/// Built-in ceiling for a check type, or `None` when the check is not
/// threshold based.
pub fn default_threshold(check_type: CheckType) -> Option<f64> {
    match check_type {
        CheckType::Cpu => Some(DEFAULT_CPU_PERCENT),
        CheckType::Memory => Some(DEFAULT_MEMORY_PERCENT),
        CheckType::Disk => Some(DEFAULT_DISK_PERCENT),
        CheckType::Network => Some(DEFAULT_NETWORK_PERCENT),
        CheckType::Service => None,
    }
}

/// Validate that a threshold lies in `(0, 100]`.
pub fn validate_threshold(value: f64, check_type: CheckType) -> Result<(), CoreError> {
    if !value.is_finite() || value <= 0.0 || value > 100.0 {
        return Err(CoreError::Validation(format!(
            "{check_type} threshold must be in (0, 100], got {value}"
        )));
    }
    Ok(())
}

/// Per-check-type percentage ceilings.
///
/// Only validated overrides are stored; [`resolve`](Self::resolve) falls back
/// to the built-in default for anything not overridden.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThresholdSet {
    overrides: BTreeMap<CheckType, f64>,
}

impl ThresholdSet {
    /// A set that resolves every check type to its built-in default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the ceiling for `check_type`.
    ///
    /// Rejects values outside `(0, 100]` and checks that have no threshold.
    /// On error the set is left unchanged, so the default keeps applying.
    pub fn set(&mut self, check_type: CheckType, value: f64) -> Result<(), CoreError> {
        if default_threshold(check_type).is_none() {
            return Err(CoreError::Validation(format!(
                "{check_type} checks do not use a threshold"
            )));
        }
        validate_threshold(value, check_type)?;
        self.overrides.insert(check_type, value);
        Ok(())
    }

    /// The effective ceiling for `check_type`. Never fails; `None` only for
    /// checks that are not threshold based.
    pub fn resolve(&self, check_type: CheckType) -> Option<f64> {
        self.overrides
            .get(&check_type)
            .copied()
            .or_else(|| default_threshold(check_type))
    }

    /// Whether `check_type` resolves to a configured value rather than the default.
    pub fn is_overridden(&self, check_type: CheckType) -> bool {
        self.overrides.contains_key(&check_type)
    }

    /// Effective thresholds for every threshold-based check type.
    pub fn effective(&self) -> Vec<EffectiveThreshold> {
        CheckType::ALL
            .iter()
            .filter_map(|&ct| {
                self.resolve(ct).map(|value| EffectiveThreshold {
                    check_type: ct,
                    value,
                    is_default: !self.is_overridden(ct),
                })
            })
            .collect()
    }
}

/// A resolved threshold, as reported to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EffectiveThreshold {
    pub check_type: CheckType,
    pub value: f64,
    pub is_default: bool,
}

/// Classify a percentage reading against a ceiling.
///
/// - `value < threshold` -> `Healthy`
/// - `threshold <= value < threshold + ESCALATION_MARGIN` -> `Warning`
/// - `value >= threshold + ESCALATION_MARGIN` -> `Critical`
///
/// Readings that are not a valid percentage (non-finite or outside
/// `[0, 100]`) classify as `Unknown`.
pub fn classify_percentage(value: f64, threshold: f64) -> CheckStatus {
    if !is_valid_percentage(value) {
        return CheckStatus::Unknown;
    }
    if value < threshold {
        CheckStatus::Healthy
    } else if value >= threshold + ESCALATION_MARGIN {
        CheckStatus::Critical
    } else {
        CheckStatus::Warning
    }
}

pub fn is_valid_percentage(value: f64) -> bool {
    value.is_finite() && (0.0..=100.0).contains(&value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
