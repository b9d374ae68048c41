//! Application routing configuration with middleware stack.
//!
//! # Middleware Stack
//!
//! ```text
//! Request
//!    │
//!    ▼
//! ┌──────────────────┐
//! │      CORS        │ ← answers preflight, allows X-API-Key
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │   Request ID     │ ← sets / propagates X-Request-Id
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │     Tracing      │ ← HTTP request/response logging
//! └────────┬─────────┘
//!          ▼
//! ┌──────────────────┐
//! │  Body Limit      │
//! └────────┬─────────┘
//!          ├──────────────── /health ──► handler
//!          ▼
//! ┌──────────────────┐
//! │  API Key Gate    │ ← /api/* only, 401 on mismatch
//! └────────┬─────────┘
//!          ▼
//!      Handler
//! ```

use axum::Router;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Request};
use axum::routing::{any, get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{Span, info, info_span, warn};

use crate::handlers;
use crate::metrics;
use crate::middleware::{API_KEY_HEADER, ApiKeyGate, REQUEST_ID_HEADER, request_id_layers};
use crate::state::AppState;

/// Build the application router with all routes and middleware configured.
///
/// Everything under `/api` passes through the [`ApiKeyGate`], including
/// unmatched paths and the bare `/api/` prefix, so probing for routes
/// without a key yields 401 rather than 404. `/health` is never gated.
pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    let gate = ApiKeyGate::new(config.api_key.clone());
    metrics::set_secret_configured(gate.has_secret());
    if gate.has_secret() {
        info!("API key gate enabled for /api");
    } else {
        warn!("X_API_KEY is not set; every /api request will be rejected with 401");
    }

    let api = Router::new()
        .route("/status", get(handlers::service_status))
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .fallback(handlers::not_found)
        .layer(gate.clone());

    let (set_request_id, propagate_request_id) = request_id_layers();

    Router::new()
        .route("/health", get(handlers::health_check))
        .method_not_allowed_fallback(handlers::method_not_allowed)
        // The nested fallback only sees non-empty remainders, so `/api/` needs its own gated route
        .route("/api/", any(handlers::not_found).layer(gate))
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(config.max_request_body_size))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(propagate_request_id)
        .layer(set_request_id)
        .layer(build_cors_layer(&config.cors_allowed_origins))
        .with_state(state)
}

/// Tracing span for one request, tagged with its request ID.
fn make_request_span(req: &Request<Body>) -> Span {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    info_span!(
        "http_request",
        method = %req.method(),
        path = %req.uri().path(),
        request_id = %request_id,
    )
}

/// Build CORS layer from configuration.
///
/// The browser frontend sends `X-API-Key` on every call, so the header has
/// to be allowed explicitly when origins are restricted.
fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(e) => {
                warn!(origin = %o, error = %e, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers([
            CONTENT_TYPE,
            AUTHORIZATION,
            HeaderName::from_static(API_KEY_HEADER),
        ])
}
