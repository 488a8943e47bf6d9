//! Error types for the cache backends
//!
//! Provides unified error handling using thiserror.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for both cache backends.
///
/// Only `set` and construction can fail. Reads degrade to "absent" instead.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Caller tried to store a zero-length payload
    #[error("refusing to cache an empty payload")]
    EmptyPayload,

    /// The memory store cannot be used (its lock was poisoned by a panicking writer)
    #[error("cache store is not initialized")]
    UninitializedStore,

    /// The file cache root directory could not be created
    #[error("failed to create cache directory {}: {source}", .path.display())]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing a payload to disk failed
    #[error("failed to write cache file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
