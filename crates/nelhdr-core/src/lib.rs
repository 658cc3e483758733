//! nelhdr core: the Network Error Logging policy record, its validation and
//! its header-value encoding.
//!
//! This crate carries no transport or runtime dependencies. Anything that can
//! store string headers implements [`HeaderSink`] and can receive a policy via
//! [`apply`] or [`revoke`].
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Validation failures
//! surface as [`ValidationError`]; encoding failures collapse to an empty header
//! value instead of an error.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod encode;
pub mod error;
pub mod policy;
pub mod sink;

pub use error::{ErrorCode, NelError, Result, ValidationError};
pub use policy::{NelPolicy, HEADER_LIST_PATTERN};
pub use sink::{apply, revoke, HeaderSink, NEL_HEADER};
