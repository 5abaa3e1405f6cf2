//! Health check orchestration.
//!
//! [`HealthMonitor`] is the entry point: it validates caller input, fans
//! check evaluation out through the [`CheckExecutor`], persists results to a
//! [`HistoryStore`] and answers history and summary queries. Every external
//! dependency is reached through a trait in [`ports`], so the monitor runs
//! the same against PostgreSQL (`msp-db`) or the in-memory adapters in
//! [`memory`].

pub mod config;
pub mod error;
pub mod executor;
pub mod memory;
pub mod monitor;
pub mod ports;

pub use config::MonitorConfig;
pub use error::MonitorError;
pub use executor::CheckExecutor;
pub use monitor::{HealthMonitor, TargetCheckOutcome, TargetCheckReport};
pub use ports::{
    ClientRegistry, HistoryStore, MetricsError, MetricsSource, Reading, ReadingSink,
    RegistryError, ServiceState, StoreError,
};
