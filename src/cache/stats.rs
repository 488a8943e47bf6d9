//! Cache Statistics Module
//!
//! Tracks read outcomes for a cache instance.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Point-in-time snapshot of cache metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of reads that returned a payload
    pub hits: u64,
    /// Number of reads that returned nothing (includes expired reads)
    pub misses: u64,
    /// Number of reads that found an entry past its expiration
    pub expired: u64,
    /// Current number of entries in the cache
    pub total_entries: usize,
    /// hits / (hits + misses), or 0.0 if no reads have been made
    pub hit_rate: f64,
}

// == Hit Rate ==
fn hit_rate(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64
    }
}

// == Stats Recorder ==
/// Lock-free counters updated from the read path.
///
/// Reads only take a shared lock on the store, so the counters cannot live
/// behind it.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
}

impl StatsRecorder {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// An expired read is also a miss.
    pub fn record_expired(&self) {
        self.expired.fetch_add(1, Ordering::Relaxed);
        self.record_miss();
    }

    pub fn snapshot(&self, total_entries: usize) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);

        CacheStats {
            hits,
            misses,
            expired: self.expired.load(Ordering::Relaxed),
            total_entries,
            hit_rate: hit_rate(hits, misses),
        }
    }
}
