//! Tracing span and event helpers for mode 6 queries.
//!
//! These helpers centralise span creation with dynamic level selection and
//! timing emission, keeping the instrumentation out of the retry loop.

use std::time::Instant;

use tracing::{Level, Span};

use super::tracing_config::TracingConfig;
use crate::request::RequestContext;

/// Create a tracing span at a dynamically selected level.
///
/// Each branch calls the matching `tracing::<level>_span!` macro so the span
/// metadata stays static per branch while the branch selection is dynamic.
macro_rules! dynamic_span {
    ($level:expr, $name:expr $(, $($field:tt)*)?) => {
        match $level {
            Level::ERROR => tracing::error_span!($name $(, $($field)*)?),
            Level::WARN  => tracing::warn_span!($name $(, $($field)*)?),
            Level::INFO  => tracing::info_span!($name $(, $($field)*)?),
            Level::DEBUG => tracing::debug_span!($name $(, $($field)*)?),
            Level::TRACE => tracing::trace_span!($name $(, $($field)*)?),
        }
    };
}

/// Create a span for a whole query.
///
/// `sequence` is the sequence of the first attempt. The `result` and
/// `final_sequence` fields are recorded when the query completes using
/// [`Span::record`]; `final_sequence` differs from `sequence` after a retry
/// that moved to a fresh sequence number.
#[expect(
    clippy::cognitive_complexity,
    reason = "complexity from dynamic_span! macro expansion"
)]
pub(crate) fn query_span(config: &TracingConfig, context: &RequestContext) -> Span {
    dynamic_span!(
        config.query_level,
        "client.query",
        opcode = %context.opcode(),
        association_id = context.association_id(),
        sequence = context.sequence(),
        final_sequence = tracing::field::Empty,
        result = tracing::field::Empty
    )
}

/// Create a span for one send-and-collect attempt.
///
/// The `fragments` field is updated with the number of fragments held each
/// time one is accepted.
#[expect(
    clippy::cognitive_complexity,
    reason = "complexity from dynamic_span! macro expansion"
)]
pub(crate) fn attempt_span(config: &TracingConfig, attempt: u8, context: &RequestContext) -> Span {
    dynamic_span!(
        config.attempt_level,
        "client.attempt",
        attempt = attempt,
        sequence = context.sequence(),
        fragments = tracing::field::Empty
    )
}

/// Record elapsed time if timing was enabled for this operation.
///
/// `start` is `None` when timing is disabled. When `Some`, an event carrying
/// `elapsed_us` is emitted at `DEBUG` level.
pub(crate) fn emit_timing_event(start: Option<Instant>) {
    if let Some(start) = start {
        let elapsed_us = start.elapsed().as_micros();
        tracing::debug!(elapsed_us = elapsed_us, "operation.timing");
    }
}
