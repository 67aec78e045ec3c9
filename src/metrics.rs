//! Metrics hooks for matcher and search calls.
//!
//! Callers install a process-wide [`MatchMetrics`] implementation via
//! [`set_match_metrics`]; every `Matcher::best_match` and `search` call then
//! reports its latency and outcome. The recorder holds no catalog state and
//! never changes results.

use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use crate::geometry::Geometry;

/// Metrics observer for catalog queries.
pub trait MatchMetrics: Send + Sync {
    /// Record the outcome of a best-match lookup.
    ///
    /// `scored` is the number of candidate presets scored (a preset listed
    /// under several of the object's keys counts once per listing), and
    /// `matched` is whether any preset scored above zero.
    fn record_match(&self, geometry: Geometry, latency: Duration, scored: usize, matched: bool);

    /// Record the outcome of a text search.
    fn record_search(&self, latency: Duration, hits: usize);
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn MatchMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn MatchMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn MatchMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

/// Install or clear the global metrics recorder.
///
/// Typically called once during startup so every catalog shares the same
/// metrics backend.
pub fn set_match_metrics(recorder: Option<Arc<dyn MatchMetrics>>) {
    let mut guard = metrics_lock()
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

pub(crate) struct MetricsSpan {
    recorder: Arc<dyn MatchMetrics>,
    start: Instant,
}

impl MetricsSpan {
    pub(crate) fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    pub(crate) fn record_match(self, geometry: Geometry, scored: usize, matched: bool) {
        self.recorder
            .record_match(geometry, self.start.elapsed(), scored, matched);
    }

    pub(crate) fn record_search(self, hits: usize) {
        self.recorder.record_search(self.start.elapsed(), hits);
    }
}
