use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::models::WebResponse;

/// Message returned to clients whenever the API key gate rejects a request.
pub const UNAUTHORIZED_MESSAGE: &str = "Invalid or Missing API Key";

/// Application-wide error types with appropriate HTTP status codes.
///
/// Every variant renders through the [`WebResponse`] envelope so clients see
/// one response shape regardless of where a request failed.
#[derive(Error, Debug)]
pub enum AppError {
    /// The API key gate rejected the request. Every rejection reason maps to
    /// this one variant.
    #[error("Invalid or Missing API Key")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) | AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            // The gate already logged the rejection with its reason
            AppError::Unauthorized => UNAUTHORIZED_MESSAGE.to_string(),

            // Client errors - safe to show the message as it's user-facing
            AppError::NotFound(msg)
            | AppError::MethodNotAllowed(msg)
            | AppError::BadRequest(msg) => msg.clone(),

            // Never expose internal details to clients
            AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                "An internal error occurred. Please contact support if the issue persists."
                    .to_string()
            }
            AppError::ConfigError(_) => {
                tracing::error!(error = %self, "Request failed");
                "Service configuration error. Please contact support.".to_string()
            }
        };

        let mut response = WebResponse::new(status, message).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("API-Key"));
        }
        response
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
