use std::time::Duration;

use msp_core::health::{CheckType, ThresholdSet};

use crate::executor::DEFAULT_CHECK_TIMEOUT;

/// Default history retention: 90 days.
pub const DEFAULT_HISTORY_RETENTION_DAYS: i64 = 90;

/// Default staleness bound for stored readings: 15 minutes.
pub const DEFAULT_READING_MAX_AGE: Duration = Duration::from_secs(900);

/// Environment keys for per-check thresholds.
const THRESHOLD_KEYS: &[(CheckType, &str)] = &[
    (CheckType::Cpu, "THRESHOLD_CPU_PERCENT"),
    (CheckType::Memory, "THRESHOLD_MEMORY_PERCENT"),
    (CheckType::Disk, "THRESHOLD_DISK_PERCENT"),
    (CheckType::Network, "THRESHOLD_NETWORK_PERCENT"),
];

/// Health monitor configuration.
///
/// Built once at startup and handed to the monitor by value; nothing reads
/// it from global state afterwards.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub thresholds: ThresholdSet,
    /// Per-check capability timeout.
    pub check_timeout: Duration,
    /// Service names evaluated by the SERVICE check.
    pub services: Vec<String>,
    /// How long check results are kept before the retention job purges them.
    pub history_retention_days: i64,
    /// Readings older than this are treated as unavailable by the local
    /// metrics backend.
    pub reading_max_age: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdSet::new(),
            check_timeout: DEFAULT_CHECK_TIMEOUT,
            services: Vec::new(),
            history_retention_days: DEFAULT_HISTORY_RETENTION_DAYS,
            reading_max_age: DEFAULT_READING_MAX_AGE,
        }
    }
}

impl MonitorConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default |
    /// |-----------------------------|---------|
    /// | `THRESHOLD_CPU_PERCENT`     | `85`    |
    /// | `THRESHOLD_MEMORY_PERCENT`  | `90`    |
    /// | `THRESHOLD_DISK_PERCENT`    | `85`    |
    /// | `THRESHOLD_NETWORK_PERCENT` | `80`    |
    /// | `CHECK_TIMEOUT_MS`          | `5000`  |
    /// | `MONITORED_SERVICES`        | (none)  |
    /// | `HISTORY_RETENTION_DAYS`    | `90`    |
    /// | `READING_MAX_AGE_SECS`      | `900`   |
    ///
    /// Malformed values are logged and replaced by their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        for &(check_type, key) in THRESHOLD_KEYS {
            let Some(raw) = lookup(key) else {
                continue;
            };
            let applied = raw
                .trim()
                .parse::<f64>()
                .map_err(|e| e.to_string())
                .and_then(|value| {
                    config
                        .thresholds
                        .set(check_type, value)
                        .map_err(|e| e.to_string())
                });
            if let Err(error) = applied {
                tracing::warn!(
                    key,
                    value = %raw,
                    error = %error,
                    default = ?config.thresholds.resolve(check_type),
                    "Invalid threshold configuration, using default",
                );
            }
        }

        if let Some(ms) = parse_positive(&lookup, "CHECK_TIMEOUT_MS") {
            config.check_timeout = Duration::from_millis(ms);
        }

        if let Some(raw) = lookup("MONITORED_SERVICES") {
            config.services = parse_service_list(&raw);
        }

        if let Some(days) = parse_positive(&lookup, "HISTORY_RETENTION_DAYS") {
            config.history_retention_days = days as i64;
        }

        if let Some(secs) = parse_positive(&lookup, "READING_MAX_AGE_SECS") {
            config.reading_max_age = Duration::from_secs(secs);
        }

        config
    }
}

/// Parse a strictly positive integer, logging and ignoring anything else.
fn parse_positive<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 && value <= i64::MAX as u64 => Some(value),
        _ => {
            tracing::warn!(key, value = %raw, "Invalid configuration value, using default");
            None
        }
    }
}

/// Split a comma-separated service list, dropping blanks and duplicates.
fn parse_service_list(raw: &str) -> Vec<String> {
    let mut services: Vec<String> = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !services.iter().any(|s| s == name) {
            services.push(name.to_string());
        }
    }
    services
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
