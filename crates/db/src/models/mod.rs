//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity matching the table and a
//! create DTO for inserts.

pub mod client;
pub mod health_check;
pub mod reading;
