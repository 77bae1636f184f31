//! Capture metrics emitted by `fragwire` with a thread-local debugging recorder.

use metrics_util::{
    CompositeKey,
    debugging::{DebugValue, DebuggingRecorder},
};

/// Counters recorded while a test body ran.
///
/// Taking a snapshot resets the recorder's counters, so the snapshot is taken
/// once and kept here for every later query.
#[derive(Debug)]
pub struct MetricsSnapshot {
    entries: Vec<(CompositeKey, DebugValue)>,
}

impl MetricsSnapshot {
    /// Sum of every counter named `name` whose labels include `label`, if given.
    #[must_use]
    pub fn counter(&self, name: &str, label: Option<(&str, &str)>) -> u64 {
        self.entries
            .iter()
            .filter(|(key, _)| key.key().name() == name)
            .filter(|(key, _)| {
                label.is_none_or(|(label_key, label_value)| {
                    key.key()
                        .labels()
                        .any(|l| l.key() == label_key && l.value() == label_value)
                })
            })
            .map(|(_, value)| match value {
                DebugValue::Counter(count) => *count,
                _ => 0,
            })
            .sum()
    }
}

/// Run `f` with a local [`DebuggingRecorder`] installed and snapshot what it recorded.
pub fn with_recorder(f: impl FnOnce()) -> MetricsSnapshot {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    ::metrics::with_local_recorder(&recorder, f);
    let entries = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(key, _, _, value)| (key, value))
        .collect();
    MetricsSnapshot { entries }
}

/// Sum of every counter named `name` whose labels include `label`, if given.
#[must_use]
pub fn counter_value(snapshot: &MetricsSnapshot, name: &str, label: Option<(&str, &str)>) -> u64 {
    snapshot.counter(name, label)
}
