//! Metric helpers for `ntp_mode6`.
//!
//! This module defines metric names and simple helper functions wrapping the
//! [`metrics`](https://docs.rs/metrics) crate. With the `metrics` feature
//! disabled the helpers compile to no-ops.

#[cfg(feature = "metrics")]
use metrics::counter;

/// Name of the counter tracking finished queries.
pub const QUERIES_TOTAL: &str = "ntp_mode6_queries_total";
/// Name of the counter tracking retried attempts.
pub const RETRIES_TOTAL: &str = "ntp_mode6_retries_total";
/// Name of the counter tracking inbound packets by outcome.
pub const PACKETS_TOTAL: &str = "ntp_mode6_packets_total";

/// What the collector made of an inbound packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PacketOutcome {
    /// Filed as a fragment.
    Accepted,
    /// Skipped as unrelated or repeated.
    Ignored,
    /// Dropped as a protocol violation.
    Invalid,
    /// Carried a server error code.
    ServerError,
}

impl PacketOutcome {
    #[cfg_attr(not(feature = "metrics"), expect(dead_code, reason = "only used as a metric label"))]
    fn as_str(self) -> &'static str {
        match self {
            PacketOutcome::Accepted => "accepted",
            PacketOutcome::Ignored => "ignored",
            PacketOutcome::Invalid => "invalid",
            PacketOutcome::ServerError => "server_error",
        }
    }
}

/// Record a finished query with its result label (`ok` or an error kind).
pub fn inc_queries(result: &'static str) {
    #[cfg(feature = "metrics")]
    counter!(QUERIES_TOTAL, "result" => result).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = result;
}

/// Record a retry after a failed first attempt.
pub fn inc_retries() {
    #[cfg(feature = "metrics")]
    counter!(RETRIES_TOTAL).increment(1);
}

/// Record an inbound packet with the given outcome.
pub fn inc_packets(outcome: PacketOutcome) {
    #[cfg(feature = "metrics")]
    counter!(PACKETS_TOTAL, "outcome" => outcome.as_str()).increment(1);
    #[cfg(not(feature = "metrics"))]
    let _ = outcome;
}
