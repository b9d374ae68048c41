//! Endpoints behind the API key gate.

use axum::Json;
use axum::extract::State;
use axum::http::{Method, Uri};
use tracing::{debug, instrument};

use crate::error::AppError;
use crate::models::{StatusData, WebResponse};
use crate::state::AppState;

/// `GET /api/status`: confirms the caller's key was accepted and reports
/// service uptime.
#[instrument(skip(state))]
pub async fn service_status(State(state): State<AppState>) -> Json<WebResponse<StatusData>> {
    Json(WebResponse::ok(StatusData {
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    }))
}

/// Fallback for unmatched paths, rendered in the response envelope.
pub async fn not_found(uri: Uri) -> AppError {
    debug!(path = %uri.path(), "No route matched");
    AppError::NotFound("Resource not found".to_string())
}

/// Fallback for a matched path hit with an unsupported method.
pub async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    debug!(%method, path = %uri.path(), "Method not allowed");
    AppError::MethodNotAllowed(format!("Method {method} is not allowed on this resource"))
}
