//! Mtime-based file identity.
//!
//! Cheap change detection for deployments where asset files are only ever
//! replaced through normal writes (timestamps move). Falls short when a
//! file is swapped with its mtime preserved; use the content-hash strategy
//! there.

use std::path::Path;
use std::time::UNIX_EPOCH;

/// Identity string from modification time and size.
///
/// Returns `None` if the file doesn't exist or its mtime cannot be read.
pub fn identity(path: &Path) -> Option<String> {
    let meta = path.metadata().ok()?;
    let modified = meta.modified().ok()?;
    let stamp = modified.duration_since(UNIX_EPOCH).ok()?;
    Some(format!(
        "{}.{:09}-{}",
        stamp.as_secs(),
        stamp.subsec_nanos(),
        meta.len()
    ))
}
