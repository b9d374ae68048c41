//! Fuzz testing for the API key gate decision.
//!
//! The input is split at its first `\n`: the left side is the configured
//! secret, the right side the presented key. The gate must:
//!
//! - Never panic on any input
//! - Authorize exactly when the secret is non-empty and equals the key
//! - Reject everything when the secret is empty
//!
//! # Running the Fuzz Tests
//!
//! ```bash
//! cargo +nightly install cargo-fuzz
//! cargo +nightly fuzz run fuzz_api_key_gate -- -max_total_time=60
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;
use retail_api_gate::{ApiKeyGate, ApiKeySecret, GateDecision, RejectReason};

fuzz_target!(|data: &[u8]| {
    let (secret, presented) = match data.iter().position(|&b| b == b'\n') {
        Some(i) => (&data[..i], Some(&data[i + 1..])),
        None => (data, None),
    };

    // Secrets come from an environment variable, so they are always UTF-8
    let Ok(secret) = std::str::from_utf8(secret) else {
        return;
    };

    let gate = ApiKeyGate::new(ApiKeySecret::new(secret));
    let decision = gate.check(presented);

    let expected = if secret.is_empty() {
        GateDecision::Rejected(RejectReason::SecretNotConfigured)
    } else {
        match presented {
            None => GateDecision::Rejected(RejectReason::MissingKey),
            Some(key) if key == secret.as_bytes() => GateDecision::Authorized,
            Some(_) => GateDecision::Rejected(RejectReason::InvalidKey),
        }
    };

    assert_eq!(decision, expected);
});
