//! # Retail API Gate
//!
//! API key gate for the retail management API, packaged as a Tower layer
//! plus a small Axum host service.
//!
//! Every request under `/api` must carry an `X-API-Key` header equal to the
//! `X_API_KEY` secret. Anything else gets
//!
//! ```json
//! {"code":401,"status":"UNAUTHORIZED","data":"Invalid or Missing API Key"}
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Axum HTTP Server                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CORS → Request ID → Trace → Body Limit                     │
//! ├──────────────────────────────┬──────────────────────────────┤
//! │  /health                     │  /api: API Key Gate          │
//! ├──────────────────────────────┴──────────────────────────────┤
//! │  Handlers (health, status)                                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Using the gate in another router
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use retail_api_gate::{ApiKeyGate, ApiKeySecret};
//!
//! let app: Router = Router::new()
//!     .route("/orders", get(|| async { "orders" }))
//!     .layer(ApiKeyGate::new(ApiKeySecret::new("abc123")));
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;
pub mod utils;

// Re-exports for convenience
pub use config::{ApiKeySecret, Config, LogFormat};
pub use error::{AppError, AppResult};
pub use middleware::{ApiKeyGate, GateDecision, RejectReason};
pub use models::WebResponse;
pub use routes::build_router;
pub use state::AppState;
