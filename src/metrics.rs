//! Metric helpers for `fragwire`.
//!
//! This module defines metric names and thin helpers wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. Without the `metrics` feature
//! the helpers compile to no-ops.

#[cfg(feature = "metrics")]
use metrics::counter;

/// Name of the counter tracking fragments handed to a sink.
pub const FRAGMENTS_SENT: &str = "fragwire_fragments_sent_total";
/// Name of the counter tracking fully reassembled payloads.
pub const PAYLOADS_REASSEMBLED: &str = "fragwire_payloads_reassembled_total";
/// Name of the counter tracking discarded inbound fragments.
pub const FRAGMENTS_REJECTED: &str = "fragwire_fragments_rejected_total";
/// Name of the counter tracking abandoned partial payloads.
pub const REASSEMBLIES_EVICTED: &str = "fragwire_reassemblies_evicted_total";

/// Record a fragment pushed to an outgoing sink.
pub fn inc_fragments_sent() {
    #[cfg(feature = "metrics")]
    counter!(FRAGMENTS_SENT).increment(1);
}

/// Record a completed payload.
pub fn inc_payloads_reassembled() {
    #[cfg(feature = "metrics")]
    counter!(PAYLOADS_REASSEMBLED).increment(1);
}

/// Record a discarded fragment, labelled with the rejection reason.
pub fn inc_fragments_rejected(reason: &'static str) {
    #[cfg(feature = "metrics")]
    counter!(FRAGMENTS_REJECTED, "reason" => reason).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = reason;
}

/// Record an evicted partial payload, labelled with the eviction cause.
pub fn inc_reassemblies_evicted(cause: &'static str) {
    #[cfg(feature = "metrics")]
    counter!(REASSEMBLIES_EVICTED, "cause" => cause).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = cause;
}
