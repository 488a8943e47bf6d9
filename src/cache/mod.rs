//! Cache Module
//!
//! Two interchangeable backends behind the [`Cache`] trait: an in-memory store
//! with per-entry TTL and a file-backed store without expiration.

mod clock;
mod entry;
mod file;
mod memory;
mod stats;


use std::time::Duration;

use crate::error::Result;

// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::CacheEntry;
pub use file::{FileCache, FileCacheConfig, CACHE_FILE_EXTENSION};
pub use memory::{Lookup, MemoryCache};
pub use stats::CacheStats;

pub(crate) use stats::StatsRecorder;

// == Public Constants ==
/// TTL used by a memory cache constructed with a zero duration.
pub const DEFAULT_MEMORY_CACHE_EXPIRES: Duration = Duration::from_secs(60);

// == Cache Trait ==
/// The get/set contract shared by every backend.
///
/// `get` never fails: a missing key, an expired entry and an I/O error all
/// read as `None`.
pub trait Cache: Send + Sync {
    /// Returns the stored payload for `key`, if any.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Stores `payload` under `key`, replacing any previous value.
    fn set(&self, key: &str, payload: &[u8]) -> Result<()>;
}
