use std::net::SocketAddr;

use serde::Deserialize;
use nelhdr_core::error::{NelError, Result};
use nelhdr_core::NelPolicy;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    #[serde(default)]
    pub gateway: GatewaySection,

    pub nel: NelSection,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(NelError::BadConfig(format!(
                "unsupported config version: {}",
                self.version
            )));
        }

        self.gateway.validate()?;
        self.nel.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|_| {
            NelError::BadConfig(format!(
                "gateway.listen must be a valid socket address: {}",
                self.listen
            ))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}

/// What the gateway does with the configured policy on every response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NelMode {
    /// Validate and send the policy.
    #[default]
    Apply,
    /// Send the policy with `max_age: 0` so browsers drop it.
    Revoke,
}

impl NelMode {
    pub fn as_str(self) -> &'static str {
        match self {
            NelMode::Apply => "apply",
            NelMode::Revoke => "revoke",
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NelSection {
    #[serde(default)]
    pub mode: NelMode,
    /// Strict: `NelPolicy` rejects unknown fields.
    pub policy: NelPolicy,
}

impl NelSection {
    /// Apply mode fails fast at boot on a policy that would never be sent.
    /// Revoke mode skips validation, like the revoke path itself.
    pub fn validate(&self) -> Result<()> {
        if self.mode == NelMode::Apply {
            self.policy.validate()?;
        }
        Ok(())
    }
}
