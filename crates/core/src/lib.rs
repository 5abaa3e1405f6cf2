//! Domain types and pure evaluation logic for client health monitoring.
//!
//! Nothing in this crate performs I/O. Orchestration (capability calls,
//! timeouts, persistence) lives in `msp-monitor`.

pub mod error;
pub mod health;
pub mod types;
