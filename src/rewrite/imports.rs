//! Recursive `@import` inlining.
//!
//! With `expand_imports` enabled, a local `@import` is replaced by the
//! target file's content at the exact point the statement occurred, which
//! preserves cascade order inside the merged bundle. The inlined content
//! has its own `url()` references rewritten relative to its own directory
//! before splicing.
//!
//! Only the plain forms `@import url(x);` and `@import "x";` are expanded.
//! Media-qualified imports stay in place (their target reference is still
//! relocated); external imports stay verbatim.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::UrlRewriter;
use crate::error::ConsolidateError;
use crate::log;
use crate::resolve::Resolved;

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)@import\s+(?:url\(\s*(?:"([^"]*)"|'([^']*)'|([^'"\s)][^)\s]*))\s*\)|"([^"]*)"|'([^']*)')\s*;"#,
    )
    .unwrap()
});

/// Inline local `@import` targets, rewriting `url()` references along the
/// way. Failed expansions log a warning and keep the original statement.
pub fn expand_imports(
    rewriter: &UrlRewriter,
    css: &str,
    source_dir: &Path,
    target_dir: &Path,
    warnings: &mut Vec<String>,
) -> String {
    let mut stack = Vec::new();
    expand(rewriter, css, source_dir, target_dir, &mut stack, warnings)
}

fn expand(
    rewriter: &UrlRewriter,
    css: &str,
    source_dir: &Path,
    target_dir: &Path,
    stack: &mut Vec<std::path::PathBuf>,
    warnings: &mut Vec<String>,
) -> String {
    let mut out = String::with_capacity(css.len());
    let mut last = 0;

    for caps in IMPORT_RE.captures_iter(css) {
        let matched = caps.get(0).unwrap();
        out.push_str(&rewriter.rewrite(&css[last..matched.start()], source_dir, target_dir));
        last = matched.end();

        let reference = import_reference(&caps);
        if rewriter.resolver().is_external(reference) {
            out.push_str(matched.as_str());
            continue;
        }

        match inline(rewriter, reference, source_dir, target_dir, stack, warnings) {
            Ok(inlined) => out.push_str(&inlined),
            Err(e) => {
                log!("warning"; "{}", e);
                warnings.push(e.to_string());
                out.push_str(matched.as_str());
            }
        }
    }

    out.push_str(&rewriter.rewrite(&css[last..], source_dir, target_dir));
    out
}

fn inline(
    rewriter: &UrlRewriter,
    reference: &str,
    source_dir: &Path,
    target_dir: &Path,
    stack: &mut Vec<std::path::PathBuf>,
    warnings: &mut Vec<String>,
) -> Result<String, ConsolidateError> {
    let resolved = rewriter
        .resolver()
        .resolve_for_read(reference, source_dir)
        .map_err(|e| ConsolidateError::import_resolution(reference, e.to_string()))?;
    let Resolved::Local { path, .. } = resolved else {
        return Err(ConsolidateError::import_resolution(
            reference,
            "not a local reference",
        ));
    };

    if stack.contains(&path) {
        return Err(ConsolidateError::import_resolution(
            reference,
            "cyclic @import",
        ));
    }

    let content = std::fs::read_to_string(&path)
        .map_err(|e| ConsolidateError::import_resolution(reference, e.to_string()))?;
    let parent = path.parent().unwrap_or(source_dir).to_path_buf();

    stack.push(path);
    let inlined = expand(rewriter, &content, &parent, target_dir, stack, warnings);
    stack.pop();
    Ok(inlined)
}

/// The reference text out of whichever alternation group matched.
fn import_reference<'t>(caps: &Captures<'t>) -> &'t str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .or_else(|| caps.get(3))
        .or_else(|| caps.get(4))
        .or_else(|| caps.get(5))
        .map(|m| m.as_str())
        .unwrap_or_default()
}
