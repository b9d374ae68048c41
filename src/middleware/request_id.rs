//! Request ID propagation for log correlation.
//!
//! Requests without an `X-Request-Id` header get a fresh UUIDv4; an
//! existing ID from the client or an upstream proxy is kept. Either way the
//! ID is echoed on the response, including 401s produced by the API key
//! gate, so a rejected call can be matched to its log line.
//!
//! ```bash
//! curl -i -H "X-Request-Id: my-correlation-id" http://localhost:3000/api/status
//! ```

use axum::http::HeaderName;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header name for request ID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the `(set, propagate)` layer pair.
///
/// The set layer must wrap the propagate layer so the ID exists on the
/// request before it is copied onto the response.
pub fn request_id_layers() -> (SetRequestIdLayer<MakeRequestUuid>, PropagateRequestIdLayer) {
    let header = HeaderName::from_static(REQUEST_ID_HEADER);
    (
        SetRequestIdLayer::new(header.clone(), MakeRequestUuid),
        PropagateRequestIdLayer::new(header),
    )
}
