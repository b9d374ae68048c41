//! Liveness endpoint.
//!
//! `GET /health` sits outside the API key gate so load balancers and
//! orchestrators can probe the process without holding the secret.

use axum::Json;
use chrono::Utc;
use tracing::instrument;

use crate::models::{HealthData, WebResponse};

/// Health check endpoint.
///
/// # Response Body
///
/// ```json
/// {
///   "code": 200,
///   "status": "OK",
///   "data": {"status": "healthy", "version": "0.1.0", "timestamp": "2024-01-15T10:30:00Z"}
/// }
/// ```
#[instrument]
pub async fn health_check() -> Json<WebResponse<HealthData>> {
    Json(WebResponse::ok(HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
    }))
}
