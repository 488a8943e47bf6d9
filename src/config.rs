//! Configuration Module
//!
//! Loads cache settings from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::{FileCacheConfig, MemoryCache};

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL in seconds for memory cache entries (0 means the 60 second default)
    pub ttl: u64,
    /// Parent directory of the file cache
    pub cache_dir: PathBuf,
    /// Name (or name prefix) of the file cache directory
    pub prefix: String,
    /// Use write-then-rename for file cache writes
    pub atomic_writes: bool,
    /// Background purge interval in seconds
    pub purge_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL` - Memory cache TTL in seconds (default: 60)
    /// - `CACHE_DIR` - File cache parent directory (default: system temp dir)
    /// - `CACHE_PREFIX` - File cache directory name (default: local_cache)
    /// - `CACHE_ATOMIC_WRITES` - `true` or `1` to enable atomic writes (default: false)
    /// - `PURGE_INTERVAL` - Purge frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            ttl: env::var("CACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ttl),
            cache_dir: env::var_os("CACHE_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            prefix: env::var("CACHE_PREFIX")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.prefix),
            atomic_writes: env::var("CACHE_ATOMIC_WRITES")
                .ok()
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.atomic_writes),
            purge_interval: env::var("PURGE_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.purge_interval),
        }
    }

    /// Builds a memory cache using the configured TTL.
    pub fn memory_cache(&self) -> MemoryCache {
        MemoryCache::new(Duration::from_secs(self.ttl))
    }

    /// File cache options for a persistent directory at `<cache_dir>/<prefix>`.
    pub fn file_cache_config(&self) -> FileCacheConfig {
        FileCacheConfig::new(self.prefix.clone())
            .parent(self.cache_dir.clone())
            .create_root(false)
            .atomic_writes(self.atomic_writes)
    }

    pub fn purge_interval(&self) -> Duration {
        Duration::from_secs(self.purge_interval)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl: 60,
            cache_dir: env::temp_dir(),
            prefix: "local_cache".to_string(),
            atomic_writes: false,
            purge_interval: 1,
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
