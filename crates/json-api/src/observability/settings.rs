//! Request-logging knobs, written once at startup and read on every request.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::config::observability::ObservabilityConfig;

static SLOW_REQUEST_MS: AtomicU64 = AtomicU64::new(1_000);
static TRUST_REMOTE_PARENT: AtomicBool = AtomicBool::new(false);

pub(super) fn configure(observability: &ObservabilityConfig) {
    SLOW_REQUEST_MS.store(observability.slow_request_threshold_ms, Ordering::Relaxed);
    TRUST_REMOTE_PARENT.store(trusts_remote_parent(observability), Ordering::Relaxed);
}

/// Inbound `traceparent` headers only matter when spans are exported.
fn trusts_remote_parent(observability: &ObservabilityConfig) -> bool {
    observability.otel_enabled && observability.otel_parent_propagation_enabled
}

pub(super) fn slow_request_threshold_ms() -> u64 {
    SLOW_REQUEST_MS.load(Ordering::Relaxed)
}

pub(super) fn trust_remote_parent() -> bool {
    TRUST_REMOTE_PARENT.load(Ordering::Relaxed)
}
