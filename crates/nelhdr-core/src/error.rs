//! Shared error types across nelhdr crates.

use thiserror::Error;

/// Stable machine-readable codes for validation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    MissingReportTo,
    PolicyRemoved,
    NegativeMaxAge,
    FractionOutOfRange,
    InvalidIncludeSubdomains,
    MalformedHeaderList,
}

impl ErrorCode {
    /// String representation used in logs and test vectors.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingReportTo => "MISSING_REPORT_TO",
            ErrorCode::PolicyRemoved => "POLICY_REMOVED",
            ErrorCode::NegativeMaxAge => "NEGATIVE_MAX_AGE",
            ErrorCode::FractionOutOfRange => "FRACTION_OUT_OF_RANGE",
            ErrorCode::InvalidIncludeSubdomains => "INVALID_INCLUDE_SUBDOMAINS",
            ErrorCode::MalformedHeaderList => "MALFORMED_HEADER_LIST",
        }
    }
}

/// First failing check reported by [`crate::NelPolicy::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("report_to field is required")]
    MissingReportTo,
    /// `max_age == 0`. Only reachable through validation; revocation bypasses it.
    #[error("NEL policy removed")]
    PolicyRemoved,
    #[error("max_age must be non-negative")]
    NegativeMaxAge,
    #[error("{0} must be a number between 0.0 and 1.0")]
    FractionOutOfRange(&'static str),
    #[error("include_subdomains must be a boolean value")]
    InvalidIncludeSubdomains,
    #[error("{0} must be a list of comma-separated header field names")]
    MalformedHeaderList(&'static str),
}

impl ValidationError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ValidationError::MissingReportTo => ErrorCode::MissingReportTo,
            ValidationError::PolicyRemoved => ErrorCode::PolicyRemoved,
            ValidationError::NegativeMaxAge => ErrorCode::NegativeMaxAge,
            ValidationError::FractionOutOfRange(_) => ErrorCode::FractionOutOfRange,
            ValidationError::InvalidIncludeSubdomains => ErrorCode::InvalidIncludeSubdomains,
            ValidationError::MalformedHeaderList(_) => ErrorCode::MalformedHeaderList,
        }
    }

    /// JSON field name the failing check looked at.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::MissingReportTo => "report_to",
            ValidationError::PolicyRemoved | ValidationError::NegativeMaxAge => "max_age",
            ValidationError::FractionOutOfRange(f) | ValidationError::MalformedHeaderList(f) => f,
            ValidationError::InvalidIncludeSubdomains => "include_subdomains",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, NelError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum NelError {
    #[error("invalid policy: {0}")]
    Validation(#[from] ValidationError),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("malformed header value: {0}")]
    Malformed(String),
    #[error("internal: {0}")]
    Internal(String),
}
