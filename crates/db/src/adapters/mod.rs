//! PostgreSQL-backed implementations of the monitor capability ports.

mod history;
mod metrics;
mod registry;

pub use history::PgHistoryStore;
pub use metrics::LocalMetricsSource;
pub use registry::PgClientRegistry;
