//! Captures metrics emitted through the `metrics` facade during a test.

use std::future::Future;

use metrics::Key;
use metrics_util::debugging::{DebugValue, DebuggingRecorder};

/// Metrics recorded while a captured future ran.
pub(crate) struct CapturedMetrics(Vec<(Key, DebugValue)>);

/// Runs `fut` to completion on a current-thread runtime with a local
/// debugging recorder installed, returning its output and what it recorded.
pub(crate) fn capture_metrics<F: Future>(fut: F) -> (F::Output, CapturedMetrics) {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();

    let output = metrics::with_local_recorder(&recorder, || runtime.block_on(fut));

    let entries = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(key, _unit, _description, value)| (key.key().clone(), value))
        .collect();
    (output, CapturedMetrics(entries))
}

impl CapturedMetrics {
    fn find(&self, name: &str, labels: &[(&str, &str)]) -> Option<&DebugValue> {
        self.0.iter().find_map(|(key, value)| {
            let matches = key.name() == name
                && labels
                    .iter()
                    .all(|(k, v)| key.labels().any(|l| l.key() == *k && l.value() == *v));
            matches.then_some(value)
        })
    }

    /// Value of the counter `name` carrying all of `labels`.
    pub(crate) fn counter(&self, name: &str, labels: &[(&str, &str)]) -> Option<u64> {
        match self.find(name, labels) {
            Some(DebugValue::Counter(n)) => Some(*n),
            _ => None,
        }
    }

    /// Number of samples in the histogram `name` carrying all of `labels`.
    pub(crate) fn histogram_samples(&self, name: &str, labels: &[(&str, &str)]) -> usize {
        match self.find(name, labels) {
            Some(DebugValue::Histogram(samples)) => samples.len(),
            _ => 0,
        }
    }
}
