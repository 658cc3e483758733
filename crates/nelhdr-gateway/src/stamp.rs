//! NEL stamping for axum responses.
//!
//! `HeaderMapSink` adapts `http::HeaderMap` to the core `HeaderSink`
//! capability; `stamp_nel` is the middleware that writes the configured policy
//! onto every outgoing response.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

use nelhdr_core::{apply, revoke, HeaderSink, NelPolicy, ValidationError};

use crate::app_state::AppState;
use crate::config::{NelMode, NelSection};

/// Borrowed header map usable as a `HeaderSink`.
pub struct HeaderMapSink<'a>(pub &'a mut HeaderMap);

impl<'a> HeaderMapSink<'a> {
    pub fn of(resp: &'a mut Response) -> Self {
        Self(resp.headers_mut())
    }
}

impl HeaderSink for HeaderMapSink<'_> {
    fn set_header(&mut self, name: &str, value: &str) {
        let name = match HeaderName::from_bytes(name.as_bytes()) {
            Ok(n) => n,
            Err(_) => {
                tracing::warn!(header = %name, "invalid header name, dropped");
                return;
            }
        };
        // from_bytes admits non-ASCII UTF-8 from report_to/expires; control bytes are refused.
        match HeaderValue::from_bytes(value.as_bytes()) {
            Ok(v) => {
                self.0.insert(name, v);
            }
            Err(_) => {
                tracing::warn!(header = %name, "invalid header value, dropped");
            }
        }
    }
}

/// Configured policy plus the mode it is sent in.
#[derive(Debug, Clone)]
pub struct NelStamp {
    mode: NelMode,
    policy: NelPolicy,
}

impl NelStamp {
    pub fn new(mode: NelMode, policy: NelPolicy) -> Self {
        Self { mode, policy }
    }

    pub fn from_config(section: &NelSection) -> Self {
        Self::new(section.mode, section.policy.clone())
    }

    pub fn mode(&self) -> NelMode {
        self.mode
    }

    pub fn policy(&self) -> &NelPolicy {
        &self.policy
    }

    /// Write the policy to `sink`.
    ///
    /// Revocation works on a copy so the configured policy survives for the
    /// next response.
    pub fn stamp<S: HeaderSink + ?Sized>(&self, sink: &mut S) -> Result<(), ValidationError> {
        match self.mode {
            NelMode::Apply => apply(sink, &self.policy),
            NelMode::Revoke => {
                let mut policy = self.policy.clone();
                revoke(sink, &mut policy);
                Ok(())
            }
        }
    }

    /// Header value `stamp` would write, if any.
    pub fn preview(&self) -> Option<String> {
        match self.mode {
            NelMode::Apply => self.policy.validate().ok().map(|_| self.policy.to_header_value()),
            NelMode::Revoke => {
                let mut policy = self.policy.clone();
                policy.remove();
                Some(policy.to_header_value())
            }
        }
    }
}

/// Middleware: stamp NEL on every response. A rejected policy leaves the
/// response untouched.
pub async fn stamp_nel(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let mut resp = next.run(req).await;
    if let Err(e) = state.nel().stamp(&mut HeaderMapSink::of(&mut resp)) {
        tracing::warn!(code = e.code().as_str(), field = e.field(), error = %e, "NEL header not set");
    }
    resp
}
