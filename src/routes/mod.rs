//! Axum router construction.
//!
//! [`build`] assembles the complete application router:
//! - Middleware layers (CORS, per-request trace-ID injection)
//! - Health / heartbeat route
//! - The `/convert` upload route

mod convert;
mod health;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use tower::ServiceBuilder;

use crate::middleware::{cors, trace};
use crate::state::AppState;

/// Build the complete Axum [`Router`] for the application.
pub fn build(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::router())
        .merge(convert::router())
        // Axum's stock 2 MiB limit is far too small for real CDR files; the
        // configured cap (plus slack for multipart framing) replaces it. The
        // convert handler enforces the exact cap while streaming.
        .layer(DefaultBodyLimit::max(
            state.config.max_upload_bytes() + 64 * 1024,
        ))
        // Outermost layers execute first on the way in.
        .layer(ServiceBuilder::new().layer(cors::cors_layer(state.clone())))
        .layer(middleware::from_fn(trace::trace_middleware))
        .with_state(state)
}
