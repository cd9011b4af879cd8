use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tracing::info;

use crate::observation::Source;

/// Records one event per resolve call, keyed by outcome source.
/// Purely observational; never affects control flow.
#[derive(Debug, Default)]
pub struct Reporter {
    face: AtomicU64,
    reid: AtomicU64,
    prelim: AtomicU64,
    new: AtomicU64,
}

/// Point-in-time view of the per-source counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReportSnapshot {
    pub face: u64,
    pub reid: u64,
    pub prelim: u64,
    pub new: u64,
    pub total: u64,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one completed resolve call.
    pub fn record(&self, source: Source, elapsed: Duration) {
        let counter = match source {
            Source::Face => &self.face,
            Source::Reid => &self.reid,
            Source::Prelim => &self.prelim,
            Source::New => &self.new,
        };
        counter.fetch_add(1, Ordering::Relaxed);

        info!(
            source = source.as_str(),
            elapsed_ms = elapsed.as_millis() as u64,
            "resolve completed"
        );
    }

    /// Return the current counter values.
    pub fn snapshot(&self) -> ReportSnapshot {
        let face = self.face.load(Ordering::Relaxed);
        let reid = self.reid.load(Ordering::Relaxed);
        let prelim = self.prelim.load(Ordering::Relaxed);
        let new = self.new.load(Ordering::Relaxed);
        ReportSnapshot {
            face,
            reid,
            prelim,
            new,
            total: face + reid + prelim + new,
        }
    }
}
