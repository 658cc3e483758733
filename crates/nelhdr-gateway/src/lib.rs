//! nelhdr gateway library entry.
//!
//! Wires strict config loading, the NEL stamping middleware, and a small axum
//! router together. Consumed by the binary (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod router;
pub mod stamp;
