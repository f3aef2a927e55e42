//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::handlers::InkscapeService;

/// State shared across all HTTP handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Server configuration (env-derived).
    pub config: Arc<Config>,
    /// Bounded-wait Inkscape runner.
    pub converter: Arc<InkscapeService>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let converter = InkscapeService::from_config(&config);
        Self {
            config: Arc::new(config),
            converter: Arc::new(converter),
        }
    }
}
