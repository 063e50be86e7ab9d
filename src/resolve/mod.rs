//! Reference classification and web-root mapping.
//!
//! Maps a logical asset reference (absolute URL, scheme-relative URL, or
//! filesystem-relative path) to a canonical filesystem path and public URL.
//! Everything matching an ignored scheme is `External` and never resolved,
//! downloaded or rewritten.

use std::path::{Path, PathBuf};

use crate::config::Paths;
use crate::error::ConsolidateError;
use crate::utils::path::normalize_lexical;

/// Outcome of resolving a reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Outside the resolver's authority; passed through unmodified.
    External(String),
    /// Inside the web root, addressable on disk and by public URL.
    Local { path: PathBuf, url: String },
}

/// Maps references onto the configured web-root/web-path pair.
pub struct PathResolver {
    paths: Paths,
    schemas: Vec<String>,
}

impl PathResolver {
    pub fn new(paths: Paths, schemas: Vec<String>) -> Self {
        Self { paths, schemas }
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    /// Scheme test: the configured prefixes plus `data:` URIs.
    pub fn is_external(&self, reference: &str) -> bool {
        reference.starts_with("data:")
            || self.schemas.iter().any(|s| reference.starts_with(s.as_str()))
    }

    /// Map a reference onto the web root.
    ///
    /// Root-relative references (leading `/`) are anchored at the web root
    /// after stripping the public prefix; anything else resolves against
    /// `base_dir`. Fails when the normalized path escapes the web root.
    pub fn resolve(&self, reference: &str, base_dir: &Path) -> Result<Resolved, ConsolidateError> {
        if self.is_external(reference) {
            return Ok(Resolved::External(reference.to_string()));
        }

        let absolute = if let Some(rooted) = reference.strip_prefix('/') {
            let web_path = self.paths.web_path();
            let rel = match reference.strip_prefix(web_path) {
                // Only strip at a path boundary (`/static/x`, not `/staticky/x`)
                Some(rest) if !web_path.is_empty() && (rest.is_empty() || rest.starts_with('/')) => {
                    rest.trim_start_matches('/')
                }
                _ => rooted,
            };
            self.paths.web_root().join(rel)
        } else {
            base_dir.join(reference)
        };

        let absolute = normalize_lexical(&absolute);
        if !absolute.starts_with(self.paths.web_root()) {
            return Err(ConsolidateError::path_resolution(
                reference,
                "escapes the web root",
            ));
        }

        let url = self.paths.url_for(&absolute).ok_or_else(|| {
            ConsolidateError::path_resolution(reference, "no public URL under the web path")
        })?;

        Ok(Resolved::Local {
            path: absolute,
            url,
        })
    }

    /// Resolve a reference whose content must be read.
    ///
    /// Additionally requires the target to exist as a file.
    pub fn resolve_for_read(
        &self,
        reference: &str,
        base_dir: &Path,
    ) -> Result<Resolved, ConsolidateError> {
        let resolved = self.resolve(reference, base_dir)?;
        if let Resolved::Local { path, .. } = &resolved
            && !path.is_file()
        {
            return Err(ConsolidateError::path_resolution(
                reference,
                format!("`{}` does not exist", path.display()),
            ));
        }
        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MinifyConfig;
    use std::fs;
    use tempfile::TempDir;

    fn resolver(dir: &TempDir, web_path: &str) -> PathResolver {
        let config = MinifyConfig::new(dir.path(), web_path);
        PathResolver::new(config.validate().unwrap(), config.schemas)
    }

    #[test]
    fn test_external_schemes_pass_through() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver(&dir, "");
        for reference in [
            "//cdn.example/x.png",
            "http://cdn.example/x.png",
            "https://cdn.example/x.png",
            "ftp://cdn.example/x.png",
            "data:image/png;base64,AAAA",
        ] {
            let resolved = resolver.resolve(reference, Path::new("/tmp")).unwrap();
            assert_eq!(resolved, Resolved::External(reference.to_string()));
        }
    }

    #[test]
    fn test_relative_reference_anchors_at_base_dir() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("css/img")).unwrap();
        let resolver = resolver(&dir, "");

        let resolved = resolver
            .resolve("img/x.png", &dir.path().join("css"))
            .unwrap();
        match resolved {
            Resolved::Local { path, url } => {
                assert_eq!(path, dir.path().join("css/img/x.png"));
                assert_eq!(url, "/css/img/x.png");
            }
            Resolved::External(_) => panic!("expected local"),
        }
    }

    #[test]
    fn test_root_relative_strips_web_path() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver(&dir, "/static");

        let resolved = resolver
            .resolve("/static/css/site.css", dir.path())
            .unwrap();
        match resolved {
            Resolved::Local { path, url } => {
                assert_eq!(path, dir.path().join("css/site.css"));
                assert_eq!(url, "/static/css/site.css");
            }
            Resolved::External(_) => panic!("expected local"),
        }
    }

    #[test]
    fn test_escape_of_web_root_fails() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver(&dir, "");
        let err = resolver
            .resolve("../../etc/passwd", &dir.path().join("css"))
            .unwrap_err();
        assert!(matches!(err, ConsolidateError::PathResolution { .. }));
    }

    #[test]
    fn test_dotdot_inside_root_is_fine() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("css/theme")).unwrap();
        let resolver = resolver(&dir, "");
        let resolved = resolver
            .resolve("../img/x.png", &dir.path().join("css/theme"))
            .unwrap();
        match resolved {
            Resolved::Local { url, .. } => assert_eq!(url, "/css/img/x.png"),
            Resolved::External(_) => panic!("expected local"),
        }
    }

    #[test]
    fn test_resolve_for_read_requires_file() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("css")).unwrap();
        let resolver = resolver(&dir, "");

        let err = resolver
            .resolve_for_read("missing.css", &dir.path().join("css"))
            .unwrap_err();
        assert!(matches!(err, ConsolidateError::PathResolution { .. }));

        fs::write(dir.path().join("css/there.css"), "a{}").unwrap();
        assert!(
            resolver
                .resolve_for_read("there.css", &dir.path().join("css"))
                .is_ok()
        );
    }
}
