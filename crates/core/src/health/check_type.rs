//! Check taxonomy and status severity.
//!
//! [`CheckType`] is a closed set. External callers hand us loosely-typed
//! tokens (`"CPU"`, `" services "`), so every entry point goes through
//! [`normalize_check_types`] before anything is dispatched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const CHECK_CPU: &str = "cpu";
pub const CHECK_MEMORY: &str = "memory";
pub const CHECK_DISK: &str = "disk";
pub const CHECK_SERVICE: &str = "service";
pub const CHECK_NETWORK: &str = "network";

/// Plural alias accepted from CLI and tool callers.
const CHECK_SERVICES_ALIAS: &str = "services";

/// All valid check type strings (as stored in the database).
pub const VALID_CHECK_TYPES: &[&str] = &[
    CHECK_CPU,
    CHECK_MEMORY,
    CHECK_DISK,
    CHECK_SERVICE,
    CHECK_NETWORK,
];

pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_WARNING: &str = "warning";
pub const STATUS_CRITICAL: &str = "critical";
pub const STATUS_UNKNOWN: &str = "unknown";

/// All valid status strings (as stored in the database).
pub const VALID_STATUSES: &[&str] = &[
    STATUS_HEALTHY,
    STATUS_WARNING,
    STATUS_CRITICAL,
    STATUS_UNKNOWN,
];

// ---------------------------------------------------------------------------
// CheckType
// ---------------------------------------------------------------------------

/// Category of health evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckType {
    Cpu,
    Memory,
    Disk,
    Service,
    Network,
}

impl CheckType {
    /// The set run when a caller does not name any check types.
    pub const DEFAULT_SET: [CheckType; 4] = [
        CheckType::Cpu,
        CheckType::Memory,
        CheckType::Disk,
        CheckType::Service,
    ];

    pub const ALL: [CheckType; 5] = [
        CheckType::Cpu,
        CheckType::Memory,
        CheckType::Disk,
        CheckType::Service,
        CheckType::Network,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => CHECK_CPU,
            Self::Memory => CHECK_MEMORY,
            Self::Disk => CHECK_DISK,
            Self::Service => CHECK_SERVICE,
            Self::Network => CHECK_NETWORK,
        }
    }

    /// Human-readable label for result messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Memory => "Memory",
            Self::Disk => "Disk",
            Self::Service => "Service",
            Self::Network => "Network",
        }
    }

    /// The utilization resource backing this check, or `None` for checks
    /// that are not percentage based.
    pub fn resource_kind(&self) -> Option<ResourceKind> {
        match self {
            Self::Cpu => Some(ResourceKind::Cpu),
            Self::Memory => Some(ResourceKind::Memory),
            Self::Disk => Some(ResourceKind::Disk),
            Self::Network => Some(ResourceKind::Network),
            Self::Service => None,
        }
    }
}

impl fmt::Display for CheckType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckType {
    type Err = CoreError;

    /// Case-insensitive, whitespace-tolerant parse. `services` is accepted
    /// as an alias of `service`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        match token.as_str() {
            CHECK_CPU => Ok(Self::Cpu),
            CHECK_MEMORY => Ok(Self::Memory),
            CHECK_DISK => Ok(Self::Disk),
            CHECK_SERVICE | CHECK_SERVICES_ALIAS => Ok(Self::Service),
            CHECK_NETWORK => Ok(Self::Network),
            _ => Err(CoreError::InvalidCheckType(s.to_string())),
        }
    }
}

/// Normalize caller-supplied check-type tokens into the closed [`CheckType`] set.
///
/// Every token must be recognized; the first unknown token rejects the whole
/// list. Duplicates collapse onto their first occurrence so a batch never
/// evaluates the same type twice.
pub fn normalize_check_types<I, S>(tokens: I) -> Result<Vec<CheckType>, CoreError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Vec::new();
    for token in tokens {
        let check_type: CheckType = token.as_ref().parse()?;
        if !out.contains(&check_type) {
            out.push(check_type);
        }
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// ResourceKind
// ---------------------------------------------------------------------------

/// A utilization resource the metrics capability can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Cpu,
    Memory,
    Disk,
    Network,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => CHECK_CPU,
            Self::Memory => CHECK_MEMORY,
            Self::Disk => CHECK_DISK,
            Self::Network => CHECK_NETWORK,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CheckStatus
// ---------------------------------------------------------------------------

/// Outcome of a single evaluation.
///
/// Variant order is severity order: `Unknown < Healthy < Warning < Critical`.
/// `Unknown` means "could not evaluate", so it ranks below `Healthy` rather
/// than being treated as a best case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Unknown,
    Healthy,
    Warning,
    Critical,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => STATUS_UNKNOWN,
            Self::Healthy => STATUS_HEALTHY,
            Self::Warning => STATUS_WARNING,
            Self::Critical => STATUS_CRITICAL,
        }
    }

    /// Convert from a database string value.
    pub fn from_str_value(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_UNKNOWN => Ok(Self::Unknown),
            STATUS_HEALTHY => Ok(Self::Healthy),
            STATUS_WARNING => Ok(Self::Warning),
            STATUS_CRITICAL => Ok(Self::Critical),
            _ => Err(CoreError::Validation(format!(
                "Invalid check status '{s}'. Must be one of: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tokens_case_insensitively() {
        assert_eq!("CPU".parse::<CheckType>().unwrap(), CheckType::Cpu);
        assert_eq!(" Memory ".parse::<CheckType>().unwrap(), CheckType::Memory);
        assert_eq!("disk".parse::<CheckType>().unwrap(), CheckType::Disk);
        assert_eq!("Network".parse::<CheckType>().unwrap(), CheckType::Network);
    }

    #[test]
    fn services_alias_maps_to_service() {
        assert_eq!("services".parse::<CheckType>().unwrap(), CheckType::Service);
        assert_eq!("SERVICE".parse::<CheckType>().unwrap(), CheckType::Service);
    }

    #[test]
    fn unknown_token_is_rejected_verbatim() {
        let err = "gpu".parse::<CheckType>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidCheckType(ref t) if t == "gpu"));
    }

    #[test]
    fn normalize_rejects_whole_list_on_one_bad_token() {
        let err = normalize_check_types(["cpu", "memory", "bogus", "disk"]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidCheckType(ref t) if t == "bogus"));
    }

    #[test]
    fn normalize_collapses_duplicates_in_first_seen_order() {
        let types = normalize_check_types(["disk", "CPU", "Disk", "services", "service"]).unwrap();
        assert_eq!(
            types,
            vec![CheckType::Disk, CheckType::Cpu, CheckType::Service]
        );
    }

    #[test]
    fn as_str_round_trips_through_from_str() {
        for ct in CheckType::ALL {
            assert_eq!(ct.as_str().parse::<CheckType>().unwrap(), ct);
            assert!(VALID_CHECK_TYPES.contains(&ct.as_str()));
        }
    }

    #[test]
    fn service_has_no_resource_kind() {
        assert_eq!(CheckType::Service.resource_kind(), None);
        assert_eq!(CheckType::Disk.resource_kind(), Some(ResourceKind::Disk));
    }

    #[test]
    fn status_ordering_ranks_unknown_lowest() {
        assert!(CheckStatus::Unknown < CheckStatus::Healthy);
        assert!(CheckStatus::Healthy < CheckStatus::Warning);
        assert!(CheckStatus::Warning < CheckStatus::Critical);
    }

    #[test]
    fn status_from_db_value() {
        assert_eq!(
            CheckStatus::from_str_value("critical").unwrap(),
            CheckStatus::Critical
        );
        assert!(CheckStatus::from_str_value("degraded").is_err());
    }
}
