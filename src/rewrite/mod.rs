//! CSS `url(...)` relocation rewriting.
//!
//! When CSS moves from its source directory into the shared minify
//! directory, every relative `url()` inside it would dangle. The rewriter
//! re-expresses each local reference relative to the bundle's directory,
//! preserving the original quoting style. External references and `data:`
//! URIs are never touched.

mod imports;

pub use imports::expand_imports;

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::debug;
use crate::resolve::{PathResolver, Resolved};
use crate::utils::path::relative_from;

/// `url(...)`: quoted or unquoted, whitespace-tolerant.
///
/// The regex crate has no backreferences, so the quote variants are spelled
/// out; exactly one of the three groups matches.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*(?:"([^"]*)"|'([^']*)'|([^'"\s)][^)\s]*))\s*\)"#).unwrap()
});

/// Rewrites CSS references for relocation into the minify directory.
pub struct UrlRewriter<'a> {
    resolver: &'a PathResolver,
}

impl<'a> UrlRewriter<'a> {
    pub fn new(resolver: &'a PathResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &PathResolver {
        self.resolver
    }

    /// Rewrite every local `url()` in `css` from `source_dir` to
    /// `target_dir`.
    ///
    /// Unresolvable references are left untouched (a dangling reference in
    /// one rule must not degrade the rest of the sheet).
    pub fn rewrite(&self, css: &str, source_dir: &Path, target_dir: &Path) -> String {
        URL_RE
            .replace_all(css, |caps: &Captures| {
                let (reference, quote) = extract_reference(caps);
                match self.relocate(reference, source_dir, target_dir) {
                    Some(relocated) => format!("url({quote}{relocated}{quote})"),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// New reference text for one `url()` occurrence, or `None` to keep it.
    fn relocate(&self, reference: &str, source_dir: &Path, target_dir: &Path) -> Option<String> {
        if self.resolver.is_external(reference) {
            return None;
        }

        // Keep ?query/#fragment suffixes on the rewritten reference
        let split = reference.find(['?', '#']).unwrap_or(reference.len());
        let (path_part, suffix) = reference.split_at(split);
        if path_part.is_empty() {
            return None;
        }

        let resolved = match self.resolver.resolve(path_part, source_dir) {
            Ok(resolved) => resolved,
            Err(e) => {
                debug!("rewrite"; "kept `{}` as-is: {}", reference, e);
                return None;
            }
        };
        let Resolved::Local { path, url } = resolved else {
            return None;
        };

        let relocated = match relative_from(&path, target_dir) {
            Some(rel) => slashed(&rel),
            // Unrelated roots: fall back to the absolute public URL
            None => url,
        };
        Some(format!("{relocated}{suffix}"))
    }
}

/// Pull the matched reference and its original quote character.
fn extract_reference<'t>(caps: &'t Captures<'t>) -> (&'t str, &'static str) {
    if let Some(m) = caps.get(1) {
        (m.as_str(), "\"")
    } else if let Some(m) = caps.get(2) {
        (m.as_str(), "'")
    } else {
        (&caps[3], "")
    }
}

fn slashed(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MinifyConfig;
    use std::fs;
    use tempfile::TempDir;

    fn setup(dir: &TempDir) -> PathResolver {
        fs::create_dir_all(dir.path().join("css/img")).unwrap();
        let config = MinifyConfig::new(dir.path(), "");
        PathResolver::new(config.validate().unwrap(), config.schemas)
    }

    #[test]
    fn test_rewrite_relative_reference() {
        let dir = TempDir::new().unwrap();
        let resolver = setup(&dir);
        let rewriter = UrlRewriter::new(&resolver);

        let css = ".logo { background: url(img/x.png); }";
        let out = rewriter.rewrite(css, &dir.path().join("css"), &dir.path().join("minify"));
        assert_eq!(out, ".logo { background: url(../css/img/x.png); }");
    }

    #[test]
    fn test_rewrite_preserves_quote_style() {
        let dir = TempDir::new().unwrap();
        let resolver = setup(&dir);
        let rewriter = UrlRewriter::new(&resolver);
        let source = dir.path().join("css");
        let target = dir.path().join("minify");

        let double = rewriter.rewrite(r#"a { background: url( "img/x.png" ); }"#, &source, &target);
        assert!(double.contains(r#"url("../css/img/x.png")"#));

        let single = rewriter.rewrite("a { background: url('img/x.png'); }", &source, &target);
        assert!(single.contains("url('../css/img/x.png')"));
    }

    #[test]
    fn test_rewrite_keeps_externals() {
        let dir = TempDir::new().unwrap();
        let resolver = setup(&dir);
        let rewriter = UrlRewriter::new(&resolver);

        let css = "a { background: url(https://cdn.example/x.png); } \
                   b { background: url(data:image/gif;base64,R0lGOD); } \
                   c { background: url(//cdn.example/y.png); }";
        let out = rewriter.rewrite(css, &dir.path().join("css"), &dir.path().join("minify"));
        assert_eq!(out, css);
    }

    #[test]
    fn test_rewrite_keeps_query_and_fragment() {
        let dir = TempDir::new().unwrap();
        let resolver = setup(&dir);
        let rewriter = UrlRewriter::new(&resolver);

        let css = "@font-face { src: url(img/f.woff2?v=3#iefix); }";
        let out = rewriter.rewrite(css, &dir.path().join("css"), &dir.path().join("minify"));
        assert!(out.contains("url(../css/img/f.woff2?v=3#iefix)"));
    }

    #[test]
    fn test_rewrite_leaves_unresolvable_untouched() {
        let dir = TempDir::new().unwrap();
        let resolver = setup(&dir);
        let rewriter = UrlRewriter::new(&resolver);

        let css = "a { background: url(../../outside.png); }";
        let out = rewriter.rewrite(css, &dir.path().join("css"), &dir.path().join("minify"));
        assert_eq!(out, css);
    }
}
