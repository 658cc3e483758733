//! Header sink abstraction and the two sink-facing operations.
//!
//! `apply` validates and leaves the sink alone on failure. `revoke` zeroes
//! `max_age` on the caller's record and writes it without validating; a
//! revoked record would not pass validation.

use std::collections::{BTreeMap, HashMap};

use crate::error::ValidationError;
use crate::policy::NelPolicy;

/// Header name the policy is written under.
pub const NEL_HEADER: &str = "NEL";

/// Anything with settable string-valued headers (an HTTP response, a header map).
///
/// `set_header` replaces any existing value for `name`.
pub trait HeaderSink {
    fn set_header(&mut self, name: &str, value: &str);
}

impl<S: HeaderSink + ?Sized> HeaderSink for &mut S {
    fn set_header(&mut self, name: &str, value: &str) {
        (**self).set_header(name, value);
    }
}

impl HeaderSink for HashMap<String, String> {
    fn set_header(&mut self, name: &str, value: &str) {
        self.insert(name.to_string(), value.to_string());
    }
}

impl HeaderSink for BTreeMap<String, String> {
    fn set_header(&mut self, name: &str, value: &str) {
        self.insert(name.to_string(), value.to_string());
    }
}

/// Validate `policy` and, if it passes, write it to `sink` under `NEL`.
///
/// On failure the sink is left untouched and the first failing check is returned.
pub fn apply<S: HeaderSink + ?Sized>(
    sink: &mut S,
    policy: &NelPolicy,
) -> Result<(), ValidationError> {
    if let Err(e) = policy.validate() {
        tracing::debug!(code = e.code().as_str(), field = e.field(), "NEL policy rejected");
        return Err(e);
    }
    sink.set_header(NEL_HEADER, &policy.to_header_value());
    Ok(())
}

/// Remove the policy: sets `policy.max_age = 0` in place, then writes the
/// revoked record to `sink`. Skips validation and always succeeds.
pub fn revoke<S: HeaderSink + ?Sized>(sink: &mut S, policy: &mut NelPolicy) {
    policy.remove();
    sink.set_header(NEL_HEADER, &policy.to_header_value());
}
