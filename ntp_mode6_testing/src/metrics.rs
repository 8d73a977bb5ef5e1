//! Helpers for asserting on metrics recorded through a local recorder.

use metrics_util::{
    CompositeKey,
    debugging::{DebugValue, DebuggingRecorder, Snapshotter},
};

/// One entry of a debugging snapshot.
pub type MetricEntry = (
    CompositeKey,
    Option<metrics::Unit>,
    Option<metrics::SharedString>,
    DebugValue,
);

/// Create a debugging recorder and its snapshotter.
#[must_use]
pub fn debugging_recorder_setup() -> (Snapshotter, DebuggingRecorder) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    (snapshotter, recorder)
}

/// Take a single snapshot of everything recorded so far.
///
/// Taking a snapshot resets the recorder's counters, so collect once per test
/// and query the returned entries with [`counter_total`].
#[must_use]
pub fn snapshot(snapshotter: &Snapshotter) -> Vec<MetricEntry> { snapshotter.snapshot().into_vec() }

/// Sum of every counter named `name` carrying the label `key=value`.
///
/// Pass `None` to ignore labels.
#[must_use]
pub fn counter_total(metrics: &[MetricEntry], name: &str, label: Option<(&str, &str)>) -> u64 {
    metrics
        .iter()
        .filter(|(key, _, _, _)| key.key().name() == name)
        .filter(|(key, _, _, _)| {
            label.is_none_or(|(k, v)| key.key().labels().any(|l| l.key() == k && l.value() == v))
        })
        .map(|(_, _, _, value)| match value {
            DebugValue::Counter(count) => *count,
            _ => 0,
        })
        .sum()
}
