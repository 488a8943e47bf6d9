//! Memory Cache Module
//!
//! In-memory backend: a HashMap of entries behind a single reader/writer lock,
//! each entry carrying its own expiration instant.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::{
    Cache, CacheEntry, CacheStats, Clock, StatsRecorder, SystemClock,
    DEFAULT_MEMORY_CACHE_EXPIRES,
};
use crate::error::{CacheError, Result};

// == Lookup ==
/// Outcome of a memory cache read, keeping "expired" apart from "missing".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// A live, non-empty payload
    Hit(Vec<u8>),
    /// No entry (or an empty one) under the key
    Miss,
    /// An entry exists but its TTL has elapsed
    Expired,
}

impl Lookup {
    /// Collapses the lookup into the two-state `get` contract.
    pub fn into_payload(self) -> Option<Vec<u8>> {
        match self {
            Lookup::Hit(payload) => Some(payload),
            Lookup::Miss | Lookup::Expired => None,
        }
    }

    /// True for a live payload.
    pub fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }
}

// == Memory Cache ==
/// Thread-safe in-memory cache with a per-entry TTL.
///
/// Every `set` stamps the entry with `now + ttl`, so rewriting a key refreshes
/// its lifetime. Expired entries stay in the map until overwritten or removed
/// by [`MemoryCache::purge_expired`].
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    stats: StatsRecorder,
}

impl MemoryCache {
    // == Constructor ==
    /// Creates a memory cache whose entries live for `ttl`.
    ///
    /// A zero `ttl` falls back to [`DEFAULT_MEMORY_CACHE_EXPIRES`] (60 seconds).
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates a memory cache reading time from `clock`.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let ttl = if ttl.is_zero() {
            DEFAULT_MEMORY_CACHE_EXPIRES
        } else {
            ttl
        };
        info!(ttl_secs = ttl.as_secs_f64(), "memory cache created");

        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            clock,
            stats: StatsRecorder::default(),
        }
    }

    /// The TTL applied to every entry set through this cache.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Lookup ==
    /// Reads `key`, telling expired entries apart from missing ones.
    ///
    /// Never panics; an unusable store reads as a miss.
    pub fn lookup(&self, key: &str) -> Lookup {
        let entries = match self.entries.read() {
            Ok(entries) => entries,
            Err(_) => {
                warn!(key, "memory cache lock poisoned, treating read as a miss");
                self.stats.record_miss();
                return Lookup::Miss;
            }
        };

        let outcome = match entries.get(key) {
            Some(entry) if entry.is_empty() => Lookup::Miss,
            Some(entry) if entry.is_expired(self.clock.now()) => Lookup::Expired,
            Some(entry) => Lookup::Hit(entry.payload.clone()),
            None => Lookup::Miss,
        };
        drop(entries);

        match &outcome {
            Lookup::Hit(_) => self.stats.record_hit(),
            Lookup::Miss => self.stats.record_miss(),
            Lookup::Expired => self.stats.record_expired(),
        }
        debug!(key, hit = outcome.is_hit(), "memory cache lookup");
        outcome
    }

    // == Get ==
    /// Returns the payload for `key` if present, non-empty and not yet expired.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.lookup(key).into_payload()
    }

    // == Set ==
    /// Inserts or replaces `key`, expiring `ttl` from now.
    ///
    /// Empty payloads are rejected and leave any previous value untouched.
    pub fn set(&self, key: &str, payload: &[u8]) -> Result<()> {
        if payload.is_empty() {
            return Err(CacheError::EmptyPayload);
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|_| CacheError::UninitializedStore)?;

        let entry = CacheEntry::new(payload.to_vec(), self.clock.now(), self.ttl);
        entries.insert(key.to_string(), entry);
        debug!(key, bytes = payload.len(), "memory cache set");

        Ok(())
    }

    // == Time To Live ==
    /// Remaining lifetime of a live entry, or None if absent or expired.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.read().ok()?;
        let now = self.clock.now();

        entries
            .get(key)
            .filter(|entry| !entry.is_empty() && !entry.is_expired(now))
            .map(|entry| entry.ttl_remaining(now))
    }

    // == Purge Expired ==
    /// Removes all expired entries and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let mut entries = match self.entries.write() {
            Ok(entries) => entries,
            Err(_) => {
                warn!("memory cache lock poisoned, skipping purge");
                return 0;
            }
        };

        let now = self.clock.now();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    // == Length ==
    /// Number of stored entries, expired ones included until purged.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// True when the map holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Stats ==
    /// Returns a snapshot of the read counters.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_MEMORY_CACHE_EXPIRES)
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("ttl", &self.ttl)
            .field("len", &self.len())
            .finish()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        MemoryCache::get(self, key)
    }

    fn set(&self, key: &str, payload: &[u8]) -> Result<()> {
        MemoryCache::set(self, key, payload)
    }
}
