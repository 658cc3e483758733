//! Shared application state for the NEL gateway.

use std::sync::Arc;

use nelhdr_core::error::Result;

use crate::config::GatewayConfig;
use crate::stamp::NelStamp;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    nel: NelStamp,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        cfg.validate()?;
        let nel = NelStamp::from_config(&cfg.nel);

        tracing::info!(
            mode = nel.mode().as_str(),
            report_to = %nel.policy().report_to,
            max_age = nel.policy().max_age,
            "NEL policy loaded"
        );

        Ok(Self {
            inner: Arc::new(AppStateInner { nel }),
        })
    }

    pub fn nel(&self) -> &NelStamp {
        &self.inner.nel
    }
}
