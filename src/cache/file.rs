//! File Cache Module
//!
//! Filesystem backend: one `<key>.cache` file per key under a root directory.
//! There is no expiration; files live until something outside removes them.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info, warn};

use crate::cache::{Cache, CacheStats, StatsRecorder};
use crate::error::{CacheError, Result};

/// File extension given to every cache file.
pub const CACHE_FILE_EXTENSION: &str = "cache";

const CACHE_FILE_SUFFIX: &str = ".cache";

// == File Cache Config ==
/// Construction options for [`FileCache`].
#[derive(Debug, Clone)]
pub struct FileCacheConfig {
    /// Name prefix of the root directory (or its full name when `create_root` is false)
    pub prefix: String,
    /// Directory the root is placed in
    pub parent: PathBuf,
    /// Create a fresh, uniquely named root. When false, `<parent>/<prefix>` is
    /// reused, so the cache survives across instances.
    pub create_root: bool,
    /// Write to a temporary file and rename it into place instead of
    /// truncating the target.
    pub atomic_writes: bool,
}

impl FileCacheConfig {
    /// Fresh root under the system temp directory, plain writes.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            parent: std::env::temp_dir(),
            create_root: true,
            atomic_writes: false,
        }
    }

    /// Directory the root is created in.
    pub fn parent(mut self, parent: impl Into<PathBuf>) -> Self {
        self.parent = parent.into();
        self
    }

    /// Whether to create a fresh unique root or reuse `<parent>/<prefix>`.
    pub fn create_root(mut self, create_root: bool) -> Self {
        self.create_root = create_root;
        self
    }

    /// Whether writes go through a temp file and rename.
    pub fn atomic_writes(mut self, atomic_writes: bool) -> Self {
        self.atomic_writes = atomic_writes;
        self
    }
}

// == File Cache ==
/// Cache that stores each payload as a raw file on disk.
#[derive(Debug)]
pub struct FileCache {
    root: PathBuf,
    atomic_writes: bool,
    // Guards nothing in memory; serializes writers against readers on this instance.
    lock: RwLock<()>,
    stats: StatsRecorder,
}

impl FileCache {
    // == Constructor ==
    /// Creates a cache in a new uniquely named directory under the system temp
    /// directory, its name starting with `prefix`.
    pub fn new(prefix: &str) -> Result<Self> {
        Self::with_config(FileCacheConfig::new(prefix))
    }

    /// Creates a cache from explicit options.
    pub fn with_config(config: FileCacheConfig) -> Result<Self> {
        let root = if config.create_root {
            tempfile::Builder::new()
                .prefix(&config.prefix)
                .tempdir_in(&config.parent)
                .map_err(|source| CacheError::DirectoryCreate {
                    path: config.parent.join(&config.prefix),
                    source,
                })?
                .keep()
        } else {
            let root = config.parent.join(&config.prefix);
            fs::create_dir_all(&root).map_err(|source| CacheError::DirectoryCreate {
                path: root.clone(),
                source,
            })?;
            root
        };

        info!(
            root = %root.display(),
            atomic_writes = config.atomic_writes,
            "file cache created"
        );

        Ok(Self {
            root,
            atomic_writes: config.atomic_writes,
            lock: RwLock::new(()),
            stats: StatsRecorder::default(),
        })
    }

    /// Directory holding this cache's files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    // == Path For ==
    /// Deterministic file path for `key`: `<root>/<key>.cache`.
    ///
    /// The key is percent-encoded (`a/b` becomes `a%2Fb`), so it cannot escape
    /// the root and distinct keys never share a file.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(file_name_for(key))
    }

    // == Get ==
    /// Returns the file contents for `key`, or None on any I/O failure.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let _guard = self.lock.read().unwrap_or_else(|e| e.into_inner());
        let path = self.path_for(key);

        match fs::read(&path) {
            Ok(payload) if !payload.is_empty() => {
                self.stats.record_hit();
                debug!(key, bytes = payload.len(), "file cache hit");
                Some(payload)
            }
            Ok(_) => {
                self.stats.record_miss();
                None
            }
            Err(e) => {
                if e.kind() != io::ErrorKind::NotFound {
                    warn!(key, path = %path.display(), error = %e, "file cache read failed");
                }
                self.stats.record_miss();
                None
            }
        }
    }

    // == Set ==
    /// Writes `payload` to the file for `key`, replacing any previous contents.
    pub fn set(&self, key: &str, payload: &[u8]) -> Result<()> {
        if payload.is_empty() {
            return Err(CacheError::EmptyPayload);
        }

        let _guard = self.lock.write().unwrap_or_else(|e| e.into_inner());
        let path = self.path_for(key);

        let written = if self.atomic_writes {
            self.write_atomic(&path, payload)
        } else {
            fs::write(&path, payload)
        };
        written.map_err(|source| CacheError::Write {
            path: path.clone(),
            source,
        })?;

        debug!(key, bytes = payload.len(), path = %path.display(), "file cache set");
        Ok(())
    }

    fn write_atomic(&self, path: &Path, payload: &[u8]) -> io::Result<()> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        tmp.write_all(payload)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    // == Length ==
    /// Number of `.cache` files currently in the root directory.
    pub fn len(&self) -> usize {
        let _guard = self.lock.read().unwrap_or_else(|e| e.into_inner());

        fs::read_dir(&self.root)
            .map(|dir| {
                dir.filter_map(|entry| entry.ok())
                    .filter(|entry| {
                        entry
                            .file_name()
                            .to_str()
                            .is_some_and(|name| name.ends_with(CACHE_FILE_SUFFIX))
                    })
                    .count()
            })
            .unwrap_or(0)
    }

    /// True when no cache files exist in the root.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Stats ==
    /// Returns read counters for this instance plus the on-disk entry count.
    ///
    /// Counters start at zero for every new `FileCache`; only the entry count
    /// reflects what earlier instances wrote.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.len())
    }
}

impl Cache for FileCache {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        FileCache::get(self, key)
    }

    fn set(&self, key: &str, payload: &[u8]) -> Result<()> {
        FileCache::set(self, key, payload)
    }
}

/// Maps a key to its file name. The encoding is reversible, so it is injective.
fn file_name_for(key: &str) -> String {
    format!("{}{}", urlencoding::encode(key), CACHE_FILE_SUFFIX)
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_cache(parent: &TempDir) -> FileCache {
        FileCache::with_config(FileCacheConfig::new("test").parent(parent.path())).unwrap()
    }

    #[test]
    fn test_new_creates_unique_dirs() {
        let parent = TempDir::new().unwrap();
        let a = test_cache(&parent);
        let b = test_cache(&parent);

        assert!(a.root().is_dir());
        assert!(b.root().is_dir());
        assert_ne!(a.root(), b.root());

        let name = a.root().file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("test"));
    }

    #[test]
    fn test_path_for() {
        let parent = TempDir::new().unwrap();
        let cache = test_cache(&parent);

        assert_eq!(cache.path_for("a"), cache.root().join("a.cache"));
        assert_eq!(cache.path_for("a_b"), cache.root().join("a_b.cache"));
        assert_eq!(cache.path_for("a/b"), cache.root().join("a%2Fb.cache"));
        assert_eq!(cache.path_for("../x"), cache.root().join("..%2Fx.cache"));
        assert_eq!(cache.path_for("100%"), cache.root().join("100%25.cache"));
        assert_eq!(cache.path_for(""), cache.root().join(".cache"));
    }

    #[test]
    fn test_similar_keys_stay_independent() {
        let parent = TempDir::new().unwrap();
        let cache = test_cache(&parent);

        cache.set("a/b", b"slash").unwrap();
        assert_eq!(cache.get("a_b"), None);
        assert_eq!(cache.get("a%2Fb"), None);

        cache.set("a:b", b"colon").unwrap();
        cache.set("a_b", b"underscore").unwrap();
        cache.set("a%2Fb", b"literal").unwrap();

        assert_eq!(cache.get("a/b"), Some(b"slash".to_vec()));
        assert_eq!(cache.get("a:b"), Some(b"colon".to_vec()));
        assert_eq!(cache.get("a_b"), Some(b"underscore".to_vec()));
        assert_eq!(cache.get("a%2Fb"), Some(b"literal".to_vec()));
        assert_eq!(cache.len(), 4);
        // Nothing was written outside the root
        assert_eq!(fs::read_dir(parent.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_empty_key_is_counted() {
        let parent = TempDir::new().unwrap();
        let cache = test_cache(&parent);

        cache.set("", b"x").unwrap();

        assert_eq!(cache.get(""), Some(b"x".to_vec()));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.stats().total_entries, 1);
    }

    #[test]
    fn test_set_and_get() {
        let parent = TempDir::new().unwrap();
        let cache = test_cache(&parent);

        cache.set("a", b"hello").unwrap();

        assert_eq!(cache.get("a"), Some(b"hello".to_vec()));
        assert_eq!(fs::read(cache.root().join("a.cache")).unwrap(), b"hello");
    }

    #[test]
    fn test_get_missing() {
        let parent = TempDir::new().unwrap();
        let cache = test_cache(&parent);
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn test_overwrite_truncates() {
        let parent = TempDir::new().unwrap();
        let cache = test_cache(&parent);

        cache.set("a", b"a much longer first payload").unwrap();
        cache.set("a", b"short").unwrap();

        assert_eq!(cache.get("a"), Some(b"short".to_vec()));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_set_empty_payload_rejected() {
        let parent = TempDir::new().unwrap();
        let cache = test_cache(&parent);
        cache.set("a", b"kept").unwrap();

        assert!(matches!(cache.set("a", b""), Err(CacheError::EmptyPayload)));
        assert_eq!(cache.get("a"), Some(b"kept".to_vec()));
        assert!(!cache.path_for("b").exists());
    }

    #[test]
    fn test_atomic_writes() {
        let parent = TempDir::new().unwrap();
        let cache = FileCache::with_config(
            FileCacheConfig::new("atomic")
                .parent(parent.path())
                .atomic_writes(true),
        )
        .unwrap();

        cache.set("a", b"first").unwrap();
        cache.set("a", b"second").unwrap();

        assert_eq!(cache.get("a"), Some(b"second".to_vec()));
        // No temp files left behind
        assert_eq!(fs::read_dir(cache.root()).unwrap().count(), 1);
    }

    #[test]
    fn test_reuse_existing_root() {
        let parent = TempDir::new().unwrap();
        let config = FileCacheConfig::new("shared")
            .parent(parent.path())
            .create_root(false);

        let first = FileCache::with_config(config.clone()).unwrap();
        first.set("a", b"persisted").unwrap();

        let second = FileCache::with_config(config).unwrap();
        assert_eq!(second.root(), parent.path().join("shared"));
        assert_eq!(second.get("a"), Some(b"persisted".to_vec()));
    }

    #[test]
    fn test_directory_create_error() {
        let parent = TempDir::new().unwrap();
        let blocker = parent.path().join("not_a_dir");
        fs::write(&blocker, b"x").unwrap();

        let result = FileCache::with_config(FileCacheConfig::new("c").parent(&blocker));
        assert!(matches!(result, Err(CacheError::DirectoryCreate { .. })));

        let result = FileCache::with_config(
            FileCacheConfig::new("c").parent(&blocker).create_root(false),
        );
        assert!(matches!(result, Err(CacheError::DirectoryCreate { .. })));
    }

    #[test]
    fn test_write_error_when_root_removed() {
        let parent = TempDir::new().unwrap();
        let cache = test_cache(&parent);
        fs::remove_dir_all(cache.root()).unwrap();

        let result = cache.set("a", b"hello");
        assert!(matches!(result, Err(CacheError::Write { .. })));
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_stats() {
        let parent = TempDir::new().unwrap();
        let cache = test_cache(&parent);
        cache.set("a", b"1").unwrap();
        cache.set("b", b"2").unwrap();

        cache.get("a");
        cache.get("missing");

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_entries, 2);
    }
}
