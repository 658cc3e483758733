//! NEL policy record.
//!
//! A [`NelPolicy`] is a plain value owned by the caller. It validates with a
//! fixed, short-circuiting check order and encodes to the compact JSON object
//! browsers expect in the `NEL` response header.
//!
//! Zero values mean "unset": empty strings, `0.0` fractions and `false` are
//! omitted from the encoded header. `max_age` is always encoded, including `0`,
//! which is how a policy is revoked.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};

use crate::encode;
use crate::error::{NelError, Result, ValidationError};

/// Comma-separated list of header field names (alphanumerics and dash).
pub const HEADER_LIST_PATTERN: &str = "^([a-zA-Z0-9-]+)(,[a-zA-Z0-9-]+)*$";

// None only if the constant pattern fails to compile; every list is then rejected.
static HEADER_LIST_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(HEADER_LIST_PATTERN).ok());

/// Network Error Logging policy.
///
/// Field order here is the wire order of the encoded header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NelPolicy {
    /// Report-To group the browser delivers reports to.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub report_to: String,
    /// Seconds the browser caches the policy. `0` removes it.
    pub max_age: i64,
    #[serde(skip_serializing_if = "is_unset_fraction", serialize_with = "finite_fraction")]
    pub failure_fraction: f64,
    #[serde(skip_serializing_if = "is_unset_fraction", serialize_with = "finite_fraction")]
    pub success_fraction: f64,
    /// Opaque date string, passed through as-is.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub expires: String,
    #[serde(skip_serializing_if = "is_false")]
    pub include_subdomains: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub request_headers: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub response_headers: String,
}

impl NelPolicy {
    /// Minimal policy: a report group and a cache lifetime. Everything else unset.
    pub fn new(report_to: impl Into<String>, max_age: i64) -> Self {
        Self {
            report_to: report_to.into(),
            max_age,
            ..Self::default()
        }
    }

    /// Run every check in order and return the first failure.
    ///
    /// Order: report_to, max_age (zero then sign), success_fraction,
    /// failure_fraction, include_subdomains, request_headers, response_headers.
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        self.check_report_to()?;
        self.check_max_age()?;
        self.check_success_fraction()?;
        self.check_failure_fraction()?;
        self.check_include_subdomains()?;
        check_header_list(&self.request_headers, "request_headers")?;
        check_header_list(&self.response_headers, "response_headers")?;
        Ok(())
    }

    /// Encode as the `NEL` header value, byte-compatible with Go's
    /// `encoding/json` output for the same record.
    ///
    /// Never fails: if the record cannot be encoded (a non-finite fraction),
    /// the result is an empty string.
    pub fn to_header_value(&self) -> String {
        match encode::to_string(self) {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(error = %e, report_to = %self.report_to, "NEL policy encode failed");
                String::new()
            }
        }
    }

    /// Parse a header value back into a record. Omitted fields take their zero
    /// value; unknown members are rejected. The result is not validated.
    pub fn from_header_value(value: &str) -> Result<Self> {
        serde_json::from_str(value).map_err(|e| NelError::Malformed(e.to_string()))
    }

    /// Mark the policy removed (`max_age = 0`).
    pub fn remove(&mut self) {
        self.max_age = 0;
    }

    pub fn is_removed(&self) -> bool {
        self.max_age == 0
    }

    fn check_report_to(&self) -> std::result::Result<(), ValidationError> {
        if self.report_to.is_empty() {
            return Err(ValidationError::MissingReportTo);
        }
        Ok(())
    }

    fn check_max_age(&self) -> std::result::Result<(), ValidationError> {
        if self.max_age == 0 {
            return Err(ValidationError::PolicyRemoved);
        }
        if self.max_age < 0 {
            return Err(ValidationError::NegativeMaxAge);
        }
        Ok(())
    }

    fn check_success_fraction(&self) -> std::result::Result<(), ValidationError> {
        check_fraction(self.success_fraction, "success_fraction")
    }

    // Checks success_fraction, not failure_fraction. Kept for compatibility with
    // deployed policies; a failure_fraction outside [0, 1] is accepted.
    fn check_failure_fraction(&self) -> std::result::Result<(), ValidationError> {
        check_fraction(self.success_fraction, "success_fraction")
    }

    // An unset (false) flag is rejected too.
    fn check_include_subdomains(&self) -> std::result::Result<(), ValidationError> {
        if !self.include_subdomains {
            return Err(ValidationError::InvalidIncludeSubdomains);
        }
        Ok(())
    }
}

fn check_fraction(v: f64, field: &'static str) -> std::result::Result<(), ValidationError> {
    // NaN compares false both ways and slips through; encoding rejects it later.
    if v != 0.0 && (v < 0.0 || v > 1.0) {
        return Err(ValidationError::FractionOutOfRange(field));
    }
    Ok(())
}

fn check_header_list(list: &str, field: &'static str) -> std::result::Result<(), ValidationError> {
    if list.is_empty() {
        return Ok(());
    }
    let ok = HEADER_LIST_RE
        .as_ref()
        .map(|re| re.is_match(list))
        .unwrap_or(false);
    if !ok {
        return Err(ValidationError::MalformedHeaderList(field));
    }
    Ok(())
}

fn is_unset_fraction(v: &f64) -> bool {
    *v == 0.0
}

fn is_false(v: &bool) -> bool {
    !*v
}

fn finite_fraction<S: Serializer>(v: &f64, s: S) -> std::result::Result<S::Ok, S::Error> {
    if !v.is_finite() {
        return Err(serde::ser::Error::custom(format!("unsupported value: {v}")));
    }
    s.serialize_f64(*v)
}
