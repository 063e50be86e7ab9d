//! Global cache for file content hashes.
//!
//! Entries carry the mtime and size observed at hash time; a lookup whose
//! current metadata differs misses, so edited files re-hash without any
//! explicit invalidation step. This matters in long-running server
//! processes where the same assets are fingerprinted on every render.

use dashmap::DashMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;

use super::ContentHash;

#[derive(Clone, Copy)]
struct CachedHash {
    hash: ContentHash,
    mtime: SystemTime,
    size: u64,
}

/// Thread-safe content-hash cache.
pub struct HashCache {
    entries: DashMap<PathBuf, CachedHash>,
}

impl HashCache {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn get(&self, path: &Path) -> Option<ContentHash> {
        let (mtime, size) = stat(path)?;
        let entry = self.entries.get(path)?;
        if entry.mtime == mtime && entry.size == size {
            Some(entry.hash)
        } else {
            None
        }
    }

    pub fn set(&self, path: &Path, hash: ContentHash) {
        if let Some((mtime, size)) = stat(path) {
            self.entries
                .insert(path.to_path_buf(), CachedHash { hash, mtime, size });
        }
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for HashCache {
    fn default() -> Self {
        Self::new()
    }
}

fn stat(path: &Path) -> Option<(SystemTime, u64)> {
    let meta = path.metadata().ok()?;
    Some((meta.modified().ok()?, meta.len()))
}

/// Global hash cache instance.
static HASH_CACHE: LazyLock<HashCache> = LazyLock::new(HashCache::new);

/// Get cached hash for a file (misses when the file changed on disk).
#[inline]
pub fn get_cached_hash(path: &Path) -> Option<ContentHash> {
    HASH_CACHE.get(path)
}

/// Store hash in global cache.
#[inline]
pub fn set_cached_hash(path: &Path, hash: ContentHash) {
    HASH_CACHE.set(path, hash);
}

/// Clear the global hash cache.
#[inline]
pub fn clear_cache() {
    HASH_CACHE.clear();
}
