//! Crash-safe persistence of bundle files.
//!
//! The minify directory is a shared, append-only resource keyed by content
//! fingerprint: writers never mutate an existing fingerprinted file. Writes
//! go to a scoped temp file and are moved into place with an atomic rename,
//! so concurrent render passes racing to materialize the same bundle either
//! both succeed harmlessly or one wins - a reader can never observe a torn
//! file.

use std::path::Path;

use crate::error::ConsolidateError;

/// Write bundle bytes to `path`, creating parent directories as needed.
///
/// If `mode` is set the permission bits are applied before the rename so
/// the file never appears with interim permissions.
pub fn write(path: &Path, bytes: &str, mode: Option<u32>) -> Result<(), ConsolidateError> {
    let io_err = |e| ConsolidateError::Write {
        path: path.to_path_buf(),
        source: e,
    };

    let parent = path.parent().ok_or_else(|| {
        io_err(std::io::Error::other("bundle path has no parent directory"))
    })?;
    std::fs::create_dir_all(parent).map_err(io_err)?;

    // Scoped temp name: unique per process AND per call (threads share a
    // pid), same filesystem as the target so the rename stays atomic
    static SEQ: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(0);
    let seq = SEQ.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    let file_name = path.file_name().unwrap_or_default().to_string_lossy();
    let temp = parent.join(format!(".{}.{}.{}.tmp", file_name, std::process::id(), seq));

    std::fs::write(&temp, bytes).map_err(io_err)?;
    apply_mode(&temp, mode).map_err(io_err)?;

    match std::fs::rename(&temp, path) {
        Ok(()) => Ok(()),
        Err(e) => {
            std::fs::remove_file(&temp).ok();
            // Losing the race to an identical fingerprinted file is success
            if path.exists() { Ok(()) } else { Err(io_err(e)) }
        }
    }
}

#[cfg(unix)]
fn apply_mode(path: &Path, mode: Option<u32>) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    if let Some(mode) = mode {
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn apply_mode(_path: &Path, _mode: Option<u32>) -> std::io::Result<()> {
    Ok(())
}
