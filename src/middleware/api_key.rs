//! API key gate middleware.
//!
//! Every request passing through the gate must carry an `X-API-Key` header
//! whose bytes equal the configured secret. Anything else is answered with
//!
//! ```json
//! {"code":401,"status":"UNAUTHORIZED","data":"Invalid or Missing API Key"}
//! ```
//!
//! and never reaches the inner service. Authorized requests are forwarded
//! untouched.
//!
//! # Fail Closed
//!
//! Unlike an optional auth layer, the gate has no "disabled" mode: when
//! `X_API_KEY` is unset or empty, every request is rejected.
//!
//! # Usage
//!
//! ```rust,ignore
//! let secret = ApiKeySecret::new("abc123");
//! let api = Router::new()
//!     .route("/status", get(status))
//!     .layer(ApiKeyGate::new(secret));
//! ```
//!
//! ```bash
//! curl -H "X-API-Key: abc123" http://localhost:3000/api/status
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::{HeaderValue, Request, Response};
use axum::response::IntoResponse;
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::config::ApiKeySecret;
use crate::error::AppError;
use crate::metrics;

/// Header name for the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Why the gate turned a request away. Only used for logs and metrics;
/// the client always receives the same 401 body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No secret configured, so nothing can match
    SecretNotConfigured,
    /// Request carried no `X-API-Key` header
    MissingKey,
    /// Header present but not equal to the secret
    InvalidKey,
}

impl RejectReason {
    /// Label used in logs and the `outcome` metric label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SecretNotConfigured => "secret_not_configured",
            Self::MissingKey => "missing_key",
            Self::InvalidKey => "invalid_key",
        }
    }
}

/// Outcome of checking one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Authorized,
    Rejected(RejectReason),
}

impl GateDecision {
    pub fn is_authorized(&self) -> bool {
        matches!(self, Self::Authorized)
    }

    fn outcome(&self) -> &'static str {
        match self {
            Self::Authorized => "authorized",
            Self::Rejected(reason) => reason.as_str(),
        }
    }
}

/// API key gate layer.
///
/// Cloning is cheap: the secret is shared behind an `Arc`.
#[derive(Clone, Debug)]
pub struct ApiKeyGate {
    secret: ApiKeySecret,
}

impl ApiKeyGate {
    /// Create a gate accepting exactly `secret`.
    pub fn new(secret: ApiKeySecret) -> Self {
        Self { secret }
    }

    /// Whether the gate can ever authorize a request.
    pub fn has_secret(&self) -> bool {
        self.secret.is_configured()
    }

    /// Decide on a presented key (the raw `X-API-Key` header bytes, if any).
    pub fn check(&self, presented: Option<&[u8]>) -> GateDecision {
        if !self.secret.is_configured() {
            return GateDecision::Rejected(RejectReason::SecretNotConfigured);
        }

        match presented {
            None => GateDecision::Rejected(RejectReason::MissingKey),
            Some(key) if self.secret.matches(key) => GateDecision::Authorized,
            Some(_) => GateDecision::Rejected(RejectReason::InvalidKey),
        }
    }

    /// Decide on a request by reading its `X-API-Key` header.
    pub fn check_request<B>(&self, req: &Request<B>) -> GateDecision {
        self.check(
            req.headers()
                .get(API_KEY_HEADER)
                .map(HeaderValue::as_bytes),
        )
    }
}

impl<S> Layer<S> for ApiKeyGate {
    type Service = ApiKeyGateService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ApiKeyGateService {
            inner,
            gate: self.clone(),
        }
    }
}

/// Service wrapper produced by [`ApiKeyGate`].
#[derive(Clone, Debug)]
pub struct ApiKeyGateService<S> {
    inner: S,
    gate: ApiKeyGate,
}

impl<S> Service<Request<Body>> for ApiKeyGateService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = Response<Body>;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let decision = self.gate.check_request(&req);
        metrics::record_gate_decision(decision.outcome());

        match decision {
            GateDecision::Authorized => {
                debug!(path = %req.uri().path(), "API key accepted");
                Box::pin(self.inner.call(req))
            }
            GateDecision::Rejected(reason) => {
                warn!(
                    method = %req.method(),
                    path = %req.uri().path(),
                    reason = reason.as_str(),
                    "Request rejected by API key gate"
                );
                let response = AppError::Unauthorized.into_response();
                Box::pin(async move { Ok::<_, S::Error>(response) })
            }
        }
    }
}
