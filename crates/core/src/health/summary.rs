//! Summary aggregator.
//!
//! Pure reduction of a result sequence into a [`HealthSummary`]. The result
//! depends only on the multiset of inputs, never their order.

use crate::health::check_type::{CheckStatus, CheckType};
use crate::health::result::{CheckResult, HealthSummary};

/// Count statuses and take the highest severity as `overall`.
///
/// An empty input summarizes to `Unknown`: no data is not evidence of health.
pub fn summarize(client_id: &str, results: &[CheckResult]) -> HealthSummary {
    let mut summary = HealthSummary {
        client_id: client_id.to_string(),
        total_checks: results.len(),
        healthy: 0,
        warning: 0,
        critical: 0,
        unknown: 0,
        overall: CheckStatus::Unknown,
        last_check_time: None,
        missing_check_types: Vec::new(),
    };

    for result in results {
        match result.status {
            CheckStatus::Healthy => summary.healthy += 1,
            CheckStatus::Warning => summary.warning += 1,
            CheckStatus::Critical => summary.critical += 1,
            CheckStatus::Unknown => summary.unknown += 1,
        }
        summary.last_check_time = summary.last_check_time.max(Some(result.checked_at));
    }

    summary.overall = results
        .iter()
        .map(|r| r.status)
        .max()
        .unwrap_or(CheckStatus::Unknown);

    summary
}

/// Summarize the latest result per check type against an expected set.
///
/// Expected types with no result are listed in `missing_check_types`. A
/// partial picture cannot be called healthy, so when coverage is incomplete
/// and nothing worse than `Healthy` was observed, `overall` is `Unknown`.
/// `Warning` and `Critical` still surface regardless of coverage.
pub fn summarize_latest(
    client_id: &str,
    latest: &[CheckResult],
    expected: &[CheckType],
) -> HealthSummary {
    let mut summary = summarize(client_id, latest);

    summary.missing_check_types = expected
        .iter()
        .copied()
        .filter(|ct| !latest.iter().any(|r| r.check_type == *ct))
        .collect();

    if !summary.missing_check_types.is_empty() && summary.overall <= CheckStatus::Healthy {
        summary.overall = CheckStatus::Unknown;
    }

    summary
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
