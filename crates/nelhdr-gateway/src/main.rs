//! nelhdr gateway binary.
//!
//! Loads `nelhdr.yaml`, then serves HTTP with the NEL header stamped on every
//! response. Log filtering via `RUST_LOG`.

use tracing_subscriber::{fmt, EnvFilter};

use nelhdr_core::error::{NelError, Result};
use nelhdr_gateway::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "nelhdr-gateway failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = config::load_from_file("nelhdr.yaml")?;
    let listen = cfg.gateway.listen_addr()?;

    let state = app_state::AppState::new(cfg)?;
    let app = router::build_router(state);

    tracing::info!(%listen, "nelhdr-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| NelError::Internal(format!("bind {listen} failed: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| NelError::Internal(format!("server failed: {e}")))
}
