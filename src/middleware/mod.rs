//! HTTP middleware for the retail API.
//!
//! - **API Key Gate**: rejects requests whose `X-API-Key` header does not
//!   equal the configured secret
//! - **Request ID**: `X-Request-Id` generation and propagation, see
//!   [`request_id_layers`]
//!
//! # Architecture
//!
//! ```text
//! Request → CORS → Request ID → Trace → [/api only] API Key Gate → Handler
//!                      ↓                                ↓
//!               X-Request-Id header              401 Unauthorized
//! ```

pub mod api_key;
mod request_id;

pub use api_key::{API_KEY_HEADER, ApiKeyGate, ApiKeyGateService, GateDecision, RejectReason};
pub use request_id::{REQUEST_ID_HEADER, request_id_layers};
