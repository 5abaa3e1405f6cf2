//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod client_repo;
pub mod health_check_repo;
pub mod reading_repo;

pub use client_repo::ClientRepo;
pub use health_check_repo::HealthCheckRepo;
pub use reading_repo::ReadingRepo;
