//! Validated filesystem/URL roots for the pipeline.
//!
//! `Paths` is the explicit counterpart to framework alias lookup: the web
//! root, the public URL prefix and the minify output directory are resolved
//! once at init and passed into the resolver by value, never read from
//! ambient state.

use std::path::{Path, PathBuf};

use super::ConfigError;
use crate::utils::path::normalize_lexical;

/// Resolved web-root / web-path / minify-dir triple.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Absolute filesystem root the public URL space maps onto.
    web_root: PathBuf,
    /// Public URL prefix, no trailing slash (may be empty or `//host/base`).
    web_path: String,
    /// Output directory for bundle files, inside `web_root`.
    minify_dir: PathBuf,
}

impl Paths {
    /// Validate the configured roots and prepare the minify directory.
    ///
    /// Creates the minify directory if missing and probes it for read and
    /// write access; any failure here is fatal for initialization.
    pub fn prepare(
        base_path: &Path,
        web_path: &str,
        minify_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if base_path.as_os_str().is_empty() {
            return Err(ConfigError::Validation("base_path is not set".into()));
        }
        let web_root = normalize_lexical(base_path);
        if !web_root.is_dir() {
            return Err(ConfigError::Validation(format!(
                "base_path `{}` is not a directory",
                web_root.display()
            )));
        }

        let minify_dir = match minify_path {
            Some(p) => normalize_lexical(p),
            None => web_root.join("minify"),
        };
        if !minify_dir.starts_with(&web_root) {
            return Err(ConfigError::Validation(format!(
                "minify_path `{}` must live under base_path `{}` so bundle URLs stay derivable",
                minify_dir.display(),
                web_root.display()
            )));
        }

        std::fs::create_dir_all(&minify_dir)
            .map_err(|e| ConfigError::Io(minify_dir.clone(), e))?;
        probe_readable(&minify_dir)?;
        probe_writable(&minify_dir)?;

        Ok(Self {
            web_root,
            web_path: web_path.trim_end_matches('/').to_string(),
            minify_dir,
        })
    }

    pub fn web_root(&self) -> &Path {
        &self.web_root
    }

    pub fn web_path(&self) -> &str {
        &self.web_path
    }

    pub fn minify_dir(&self) -> &Path {
        &self.minify_dir
    }

    /// Public URL for a file under the web root.
    ///
    /// Returns `None` for paths outside the root.
    pub fn url_for(&self, path: &Path) -> Option<String> {
        let rel = normalize_lexical(path);
        let rel = rel.strip_prefix(&self.web_root).ok()?;
        let mut url = String::from(&self.web_path);
        for component in rel.components() {
            url.push('/');
            url.push_str(&component.as_os_str().to_string_lossy());
        }
        Some(url)
    }
}

/// Directory for compressed assets must be readable.
fn probe_readable(dir: &Path) -> Result<(), ConfigError> {
    std::fs::read_dir(dir)
        .map(|_| ())
        .map_err(|e| ConfigError::Io(dir.to_path_buf(), e))
}

/// Directory for compressed assets must be writable.
fn probe_writable(dir: &Path) -> Result<(), ConfigError> {
    let probe = dir.join(format!(".viewmin-probe-{}", std::process::id()));
    std::fs::write(&probe, b"").map_err(|e| ConfigError::Io(dir.to_path_buf(), e))?;
    std::fs::remove_file(&probe).ok();
    Ok(())
}
