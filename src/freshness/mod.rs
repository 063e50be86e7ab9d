//! File identity fingerprinting: mtime for speed, content-hash for truth.
//!
//! The fingerprinter is the sole source of change-detection truth: the
//! consolidation engine never re-derives freshness any other way. A changed
//! fingerprint changes the bundle filename; an unchanged one reuses the
//! file already on disk.

mod cache;
mod hash;
mod mtime;

pub use cache::clear_cache;
pub use hash::{ContentHash, compute_file_hash};

use std::path::Path;

use crate::config::FileCheck;

/// Stable identity of a file member.
///
/// Object-safe so tests can inject a scripted fingerprinter.
pub trait Fingerprint: Send + Sync {
    /// Identity string for the file at `path`, or `None` when unreadable.
    fn fingerprint(&self, path: &Path) -> Option<String>;
}

/// Modification time + size identity (fast, trusts timestamps).
pub struct MtimeFingerprint;

impl Fingerprint for MtimeFingerprint {
    fn fingerprint(&self, path: &Path) -> Option<String> {
        mtime::identity(path)
    }
}

/// Full-content blake3 identity (survives file replacement with a
/// preserved timestamp).
pub struct ContentHashFingerprint;

impl Fingerprint for ContentHashFingerprint {
    fn fingerprint(&self, path: &Path) -> Option<String> {
        let hash = hash::compute_file_hash(path);
        if hash.is_empty() {
            None
        } else {
            Some(hash.to_hex())
        }
    }
}

/// Strategy for the configured algorithm.
pub fn for_algorithm(algorithm: FileCheck) -> Box<dyn Fingerprint> {
    match algorithm {
        FileCheck::Mtime => Box::new(MtimeFingerprint),
        FileCheck::ContentHash => Box::new(ContentHashFingerprint),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_for_algorithm_selects_strategy() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.css");
        fs::write(&path, "a{}").unwrap();

        let mtime = for_algorithm(FileCheck::Mtime);
        let content = for_algorithm(FileCheck::ContentHash);
        let m = mtime.fingerprint(&path).unwrap();
        let c = content.fingerprint(&path).unwrap();
        assert_ne!(m, c);
        // content identity is a full blake3 hex digest
        assert_eq!(c.len(), 64);
    }

    #[test]
    fn test_missing_file_has_no_identity() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.css");
        assert!(MtimeFingerprint.fingerprint(&missing).is_none());
        assert!(ContentHashFingerprint.fingerprint(&missing).is_none());
    }
}
