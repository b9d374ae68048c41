//! Prometheus metrics for the API key gate.
//!
//! # Available Metrics
//!
//! - `api_key_gate_decisions_total` (counter, label `outcome`): one increment
//!   per gated request. Outcomes: `authorized`, `secret_not_configured`,
//!   `missing_key`, `invalid_key`.
//! - `api_key_gate_secret_configured` (gauge): 1 when `X_API_KEY` is set, 0 otherwise.
//!
//! Recording functions are no-ops until [`init_metrics`] installs the
//! exporter, so tests and metrics-disabled deployments can call them freely.

use std::net::SocketAddr;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing::{error, info};

/// Metric names as constants for consistency.
pub mod names {
    pub const GATE_DECISIONS_TOTAL: &str = "api_key_gate_decisions_total";
    pub const GATE_SECRET_CONFIGURED: &str = "api_key_gate_secret_configured";
}

/// Install the Prometheus exporter listening on `metrics_addr`.
pub fn init_metrics(metrics_addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(metrics_addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))?;

    describe_counter!(
        names::GATE_DECISIONS_TOTAL,
        "API key gate decisions by outcome"
    );
    describe_gauge!(
        names::GATE_SECRET_CONFIGURED,
        "Whether the API key secret is configured (1 = yes, 0 = no)"
    );

    info!(addr = %metrics_addr, "Prometheus metrics endpoint started");
    Ok(())
}

/// Try to initialize metrics, logging any errors but not failing.
pub fn try_init_metrics(metrics_addr: SocketAddr) {
    if let Err(e) = init_metrics(metrics_addr) {
        error!(error = %e, "Failed to initialize metrics, continuing without metrics");
    }
}

/// Count one gate decision.
pub fn record_gate_decision(outcome: &'static str) {
    counter!(names::GATE_DECISIONS_TOTAL, "outcome" => outcome).increment(1);
}

/// Publish whether the gate has a secret to compare against.
pub fn set_secret_configured(configured: bool) {
    gauge!(names::GATE_SECRET_CONFIGURED).set(if configured { 1.0 } else { 0.0 });
}
