//! Shared application state for Axum handlers.
//!
//! The state is cloned into every handler, so everything inside it sits
//! behind an `Arc` or is `Copy`. It holds no mutable data: the API key gate
//! receives its secret directly from the configuration and never reads
//! state at request time.

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;

/// Shared application state for Axum handlers.
#[derive(Clone)]
pub struct AppState {
    /// Timestamp when the application started
    pub started_at: Instant,
    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            started_at: Instant::now(),
            config: Arc::new(config),
        }
    }

    /// Get the application uptime in seconds.
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
