use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response envelope shared by every endpoint of the retail API.
///
/// ```json
/// {"code": 401, "status": "UNAUTHORIZED", "data": "Invalid or Missing API Key"}
/// ```
///
/// `code` mirrors the HTTP status, `status` is its upper-snake reason tag
/// and `data` carries either the payload or a human readable message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebResponse<T> {
    pub code: u16,
    pub status: String,
    pub data: T,
}

impl<T> WebResponse<T> {
    /// Build an envelope for `status`, deriving the tag from its reason phrase.
    pub fn new(status: StatusCode, data: T) -> Self {
        Self {
            code: status.as_u16(),
            status: status_tag(status),
            data,
        }
    }

    /// Shorthand for a `200 OK` envelope.
    pub fn ok(data: T) -> Self {
        Self::new(StatusCode::OK, data)
    }

    /// HTTP status the envelope is sent with.
    ///
    /// Falls back to 500 if `code` was deserialized from something invalid.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl<T: Serialize> IntoResponse for WebResponse<T> {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self)).into_response()
    }
}

/// Upper-snake tag for a status: `401` -> `UNAUTHORIZED`, `200` -> `OK`.
pub fn status_tag(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("UNKNOWN")
        .to_ascii_uppercase()
        .replace([' ', '-'], "_")
        .replace('\'', "")
}

/// Payload of `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthData {
    /// Always "healthy" while the process serves requests
    pub status: String,
    /// Service version
    pub version: String,
    /// Current timestamp
    pub timestamp: DateTime<Utc>,
}

/// Payload of `GET /api/status`, only reachable past the API key gate.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusData {
    pub service: String,
    pub version: String,
    pub uptime_seconds: u64,
}
