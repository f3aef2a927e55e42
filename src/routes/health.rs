//! Health / heartbeat endpoint.

use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::config::SERVICE_NAME;
use crate::state::AppState;

/// Register health-check routes.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

/// Heartbeat endpoint.
///
/// Returns `{"status": "healthy", "service": "cdr-converter"}` with HTTP 200.
/// Load-balancers and monitoring systems should poll this endpoint.
pub async fn get_health() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
    }))
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn health_response_has_healthy_status() {
        let Json(body) = get_health().await;
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn health_response_names_the_service() {
        let Json(body) = get_health().await;
        assert_eq!(body["service"], "cdr-converter");
    }
}
