//! Bundle assembly: member reads, CSS relocation, charset handling.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::asset::{AssetItem, AssetKind, ContentType};
use crate::log;
use crate::rewrite::{UrlRewriter, expand_imports};

/// `@charset "...";` - at most one may survive into the output, first line.
static CHARSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)@charset\s+"([^"]*)"\s*;\s*"#).unwrap());

/// The concatenated bundle text plus the first charset seen in any member.
pub struct Assembled {
    pub text: String,
    pub charset: Option<String>,
}

/// Concatenate members in order.
///
/// Inline text is taken as-is; file members are read from disk and, for
/// CSS, relocated from their own directory into the minify directory. A
/// member that fails to read is skipped with a warning - one broken asset
/// must not blank the whole bundle.
pub fn assemble(
    ty: ContentType,
    members: &[AssetItem],
    rewriter: &UrlRewriter,
    minify_dir: &Path,
    expand: bool,
    warnings: &mut Vec<String>,
) -> Assembled {
    let mut text = String::new();
    let mut charset = None;

    for member in members {
        let piece = match &member.kind {
            AssetKind::Inline { content } => content.clone(),
            AssetKind::File { path, .. } => match std::fs::read_to_string(path) {
                Ok(content) => match ty {
                    ContentType::Css => {
                        let source_dir = path.parent().unwrap_or(minify_dir);
                        if expand {
                            expand_imports(rewriter, &content, source_dir, minify_dir, warnings)
                        } else {
                            rewriter.rewrite(&content, source_dir, minify_dir)
                        }
                    }
                    ContentType::Js => content,
                },
                Err(e) => {
                    let warning = format!("skipped member `{}`: {}", path.display(), e);
                    log!("warning"; "{}", warning);
                    warnings.push(warning);
                    continue;
                }
            },
            // Externals never reach a bundle; partition routes them around
            AssetKind::External { url } => {
                debug_assert!(false, "external member in bundle: {url}");
                continue;
            }
        };

        let piece = if ty == ContentType::Css {
            strip_charsets(&piece, &mut charset)
        } else {
            piece
        };

        if !text.is_empty() && !piece.is_empty() {
            text.push_str(ty.separator());
        }
        text.push_str(&piece);
    }

    Assembled { text, charset }
}

/// Remove every `@charset` rule, remembering the first one seen.
fn strip_charsets(css: &str, first: &mut Option<String>) -> String {
    CHARSET_RE
        .replace_all(css, |caps: &regex::Captures| {
            if first.is_none() {
                *first = Some(caps[1].to_string());
            }
            String::new()
        })
        .into_owned()
}

/// Render the single output charset line, if any.
pub fn charset_line(forced: Option<&str>, detected: Option<&str>) -> Option<String> {
    forced
        .or(detected)
        .map(|charset| format!("@charset \"{charset}\";\n"))
}
