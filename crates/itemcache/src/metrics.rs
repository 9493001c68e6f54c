//! Cache activity counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing cache activity.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    /// Items accepted by submit
    pub items_submitted: AtomicU64,
    /// Insert entries fully processed by the worker
    pub items_processed: AtomicU64,
    /// Inserts resolved to an already-known canonical item
    pub dedup_hits: AtomicU64,
    /// Inserts whose fingerprint matched a bucket of unequal items
    pub fingerprint_collisions: AtomicU64,
    /// Flush barriers completed
    pub flushes: AtomicU64,
    /// Submits that observed a full queue before blocking
    pub full_waits: AtomicU64,
}

// All methods use `Ordering::Relaxed` because these are purely statistical
// counters: no code path depends on them being up to date, they guard no
// other data, and slightly stale reads are fine for observability. Relaxed
// avoids memory barriers in the submit hot path.
impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items_submitted(&self) -> u64 {
        self.items_submitted.load(Ordering::Relaxed)
    }

    pub fn items_processed(&self) -> u64 {
        self.items_processed.load(Ordering::Relaxed)
    }

    pub fn dedup_hits(&self) -> u64 {
        self.dedup_hits.load(Ordering::Relaxed)
    }

    pub fn fingerprint_collisions(&self) -> u64 {
        self.fingerprint_collisions.load(Ordering::Relaxed)
    }

    pub fn flushes(&self) -> u64 {
        self.flushes.load(Ordering::Relaxed)
    }

    pub fn full_waits(&self) -> u64 {
        self.full_waits.load(Ordering::Relaxed)
    }
}
