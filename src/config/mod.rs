//! Runtime configuration for the consolidation pipeline.
//!
//! `MinifyConfig` mirrors the host-facing option surface. It can be
//! deserialized from a TOML section or built directly in code; either way
//! [`MinifyConfig::validate`] must run once at startup - it prepares the
//! minify directory and is the only place a hard failure is allowed.

mod error;
mod paths;

pub use error::ConfigError;
pub use paths::Paths;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::asset::Position;

/// Fingerprint strategy selector.
///
/// `mtime` is fast but trusts timestamps; `sha1`/`content-hash` reads the
/// full bytes and survives file replacement with a preserved mtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileCheck {
    #[serde(alias = "filemtime")]
    Mtime,
    #[serde(alias = "sha1")]
    ContentHash,
}

/// Recognized options of the consolidation pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MinifyConfig {
    /// Master switch; when off the pipeline passes registrations through.
    pub enable_minify: bool,
    pub file_check_algorithm: FileCheck,
    /// Bundle CSS/JS into shared files; when off each item becomes a
    /// singleton bundle (still minified if the minify flags are on).
    pub concat_css: bool,
    pub concat_js: bool,
    pub minify_css: bool,
    pub minify_js: bool,
    /// Public URL prefix the web root is served under.
    pub web_path: String,
    /// Absolute filesystem path of the web root.
    pub base_path: PathBuf,
    /// Output directory for bundle files; defaults to `base_path`/minify.
    pub minify_path: Option<PathBuf>,
    /// JS placement classes eligible for consolidation.
    pub js_position: Vec<Position>,
    /// Force a single `@charset` declaration on CSS bundles.
    pub force_charset: Option<String>,
    /// Inline local `@import` targets into the bundle.
    pub expand_imports: bool,
    /// Line-wrap threshold for minified CSS; 0 disables wrapping.
    pub css_linebreak_pos: usize,
    /// Permission bits for written bundle files; `None` leaves the umask.
    pub file_mode: Option<u32>,
    /// URL prefixes treated as external (passed through untouched).
    pub schemas: Vec<String>,
    /// Asset-bundle identifiers that bypass consolidation.
    pub exclude_bundles: Vec<String>,
}

impl Default for MinifyConfig {
    fn default() -> Self {
        Self {
            enable_minify: true,
            file_check_algorithm: FileCheck::ContentHash,
            concat_css: true,
            concat_js: true,
            minify_css: true,
            minify_js: true,
            web_path: String::new(),
            base_path: PathBuf::new(),
            minify_path: None,
            js_position: vec![Position::End, Position::Head],
            force_charset: None,
            expand_imports: true,
            css_linebreak_pos: 2048,
            file_mode: Some(0o664),
            schemas: vec![
                "//".into(),
                "http://".into(),
                "https://".into(),
                "ftp://".into(),
            ],
            exclude_bundles: Vec::new(),
        }
    }
}

impl MinifyConfig {
    /// Config rooted at a web directory, everything else at defaults.
    pub fn new(base_path: impl Into<PathBuf>, web_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            web_path: web_path.into(),
            ..Self::default()
        }
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Ok(toml::from_str(&text)?)
    }

    /// Resolve and probe the configured roots.
    ///
    /// Must be called once before consolidation; errors here abort
    /// initialization (the output directory itself being unusable is the
    /// one non-degradable failure).
    pub fn validate(&self) -> Result<Paths, ConfigError> {
        Paths::prepare(&self.base_path, &self.web_path, self.minify_path.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_option_table() {
        let config = MinifyConfig::default();
        assert!(config.enable_minify);
        assert_eq!(config.file_check_algorithm, FileCheck::ContentHash);
        assert!(config.concat_css && config.concat_js);
        assert_eq!(config.js_position, vec![Position::End, Position::Head]);
        assert_eq!(config.css_linebreak_pos, 2048);
        assert_eq!(config.file_mode, Some(0o664));
        assert_eq!(config.schemas.len(), 4);
        assert!(config.expand_imports);
    }

    #[test]
    fn test_deserialize_partial_toml() {
        let config: MinifyConfig = toml::from_str(
            r#"
            base_path = "/srv/www/public"
            web_path = "/static"
            file_check_algorithm = "mtime"
            concat_js = false
            js_position = ["head"]
            "#,
        )
        .unwrap();
        assert_eq!(config.base_path, PathBuf::from("/srv/www/public"));
        assert_eq!(config.file_check_algorithm, FileCheck::Mtime);
        assert!(!config.concat_js);
        assert!(config.concat_css);
        assert_eq!(config.js_position, vec![Position::Head]);
    }

    #[test]
    fn test_file_check_aliases() {
        let config: MinifyConfig =
            toml::from_str(r#"file_check_algorithm = "sha1""#).unwrap();
        assert_eq!(config.file_check_algorithm, FileCheck::ContentHash);
        let config: MinifyConfig =
            toml::from_str(r#"file_check_algorithm = "content-hash""#).unwrap();
        assert_eq!(config.file_check_algorithm, FileCheck::ContentHash);
    }

    #[test]
    fn test_validate_requires_base_path() {
        let config = MinifyConfig::default();
        assert!(config.validate().is_err());
    }
}
