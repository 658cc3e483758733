//! Top-level facade crate for nelhdr.
//!
//! Re-exports the NEL policy core and the axum gateway so users can depend on a single crate.

pub mod core {
    pub use nelhdr_core::*;
}

pub mod gateway {
    pub use nelhdr_gateway::*;
}
