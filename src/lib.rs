//! Local Cache - in-memory and on-disk caching behind one get/set contract
//!
//! Provides a memory backend with per-entry TTL expiration and a file backend
//! that stores each payload as a raw file.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, FileCache, FileCacheConfig, MemoryCache};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_purge_task;
