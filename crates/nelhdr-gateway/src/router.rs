//! Axum router wiring.
//!
//! Every route passes through the NEL stamping middleware.

use axum::{extract::State, http::header, middleware, routing::get, Router};

use crate::{app_state::AppState, stamp};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/v1/nel", get(current_policy))
        .layer(middleware::from_fn_with_state(state.clone(), stamp::stamp_nel))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

/// The header value being stamped. Empty when the policy is rejected or
/// cannot be encoded.
async fn current_policy(
    State(state): State<AppState>,
) -> ([(header::HeaderName, &'static str); 1], String) {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.nel().preview().unwrap_or_default(),
    )
}
