//! Consolidation error taxonomy.
//!
//! Only [`crate::config::ConfigError`] is allowed to abort a render; every
//! variant here degrades: an unresolvable member is skipped, an
//! unresolvable `@import` stays in place, a failing minifier falls back to
//! unminified output, and a failed write drops only its own bundle.

use std::path::PathBuf;
use thiserror::Error;

/// Per-member and per-bundle consolidation errors.
#[derive(Debug, Error)]
pub enum ConsolidateError {
    /// A member reference cannot be mapped onto the web root or read.
    #[error("cannot resolve `{reference}`: {reason}")]
    PathResolution { reference: String, reason: String },

    /// A local `@import` target is missing or cyclic.
    #[error("cannot expand @import `{reference}`: {reason}")]
    ImportResolution { reference: String, reason: String },

    /// The pluggable minifier rejected the assembled bundle text.
    #[error("minification failed: {0}")]
    Minification(String),

    /// The bundle file could not be persisted.
    #[error("cannot write bundle `{path}`")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConsolidateError {
    pub fn path_resolution(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PathResolution {
            reference: reference.into(),
            reason: reason.into(),
        }
    }

    pub fn import_resolution(reference: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ImportResolution {
            reference: reference.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_contains_reference() {
        let err = ConsolidateError::path_resolution("../../etc/passwd", "escapes web root");
        let display = format!("{err}");
        assert!(display.contains("../../etc/passwd"));
        assert!(display.contains("escapes web root"));
    }

    #[test]
    fn test_write_error_carries_source() {
        use std::error::Error;
        let err = ConsolidateError::Write {
            path: PathBuf::from("/out/abc.css"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
    }
}
