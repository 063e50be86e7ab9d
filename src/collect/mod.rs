//! Per-pass accumulation of registered assets.
//!
//! The collector keeps, per content-type, the ordered list of items
//! registered while the page renders. Registration order is load-bearing:
//! it decides both bundle boundaries and member order inside each bundle.

mod capture;

pub use capture::CaptureStack;

use rustc_hash::FxHashSet;

use crate::asset::{AssetItem, AssetOptions, ContentType, Position};
use crate::debug;
use crate::resolve::{PathResolver, Resolved};

/// Ordered, deduplicated registrations for one render pass.
#[derive(Default)]
pub struct AssetCollector {
    css: Vec<AssetItem>,
    js: Vec<AssetItem>,
    seen_css: FxHashSet<String>,
    seen_js: FxHashSet<String>,
}

impl AssetCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an inline CSS block. First registration wins on key clash.
    pub fn register_css(
        &mut self,
        content: impl Into<String>,
        options: AssetOptions,
        key: Option<String>,
    ) {
        self.push(
            ContentType::Css,
            AssetItem::inline(content, Position::Head, options, key),
        );
    }

    /// Register a CSS file by reference (public URL or web-root path).
    pub fn register_css_file(
        &mut self,
        reference: &str,
        resolver: &PathResolver,
        options: AssetOptions,
        key: Option<String>,
    ) {
        let item = file_item(reference, resolver, Position::Head, options, key);
        self.push(ContentType::Css, item);
    }

    /// Register an inline JS block. First registration wins on key clash.
    pub fn register_js(
        &mut self,
        content: impl Into<String>,
        position: Position,
        key: Option<String>,
    ) {
        self.push(
            ContentType::Js,
            AssetItem::inline(content, position, AssetOptions::new(), key),
        );
    }

    /// Register a JS file by reference (public URL or web-root path).
    pub fn register_js_file(
        &mut self,
        reference: &str,
        resolver: &PathResolver,
        position: Position,
        key: Option<String>,
    ) {
        let item = file_item(reference, resolver, position, AssetOptions::new(), key);
        self.push(ContentType::Js, item);
    }

    /// Append an already-built item (bundle registry integration).
    pub fn push(&mut self, ty: ContentType, item: AssetItem) {
        let (items, seen) = match ty {
            ContentType::Css => (&mut self.css, &mut self.seen_css),
            ContentType::Js => (&mut self.js, &mut self.seen_js),
        };
        // Register-once semantics: the first item under a key survives
        if seen.insert(item.key.clone()) {
            items.push(item);
        } else {
            debug!("collect"; "duplicate {} key `{}` ignored", ty.as_str(), item.key);
        }
    }

    pub fn items(&self, ty: ContentType) -> &[AssetItem] {
        match ty {
            ContentType::Css => &self.css,
            ContentType::Js => &self.js,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.css.is_empty() && self.js.is_empty()
    }

    /// Consume into the per-type item lists (css, js).
    pub fn into_parts(self) -> (Vec<AssetItem>, Vec<AssetItem>) {
        (self.css, self.js)
    }
}

/// Build the item for a file reference: external pass-through, resolved
/// local file, or (when resolution fails) pass-through of the raw
/// reference so a broken registration degrades instead of blanking output.
fn file_item(
    reference: &str,
    resolver: &PathResolver,
    position: Position,
    options: AssetOptions,
    key: Option<String>,
) -> AssetItem {
    match resolver.resolve(reference, resolver.paths().web_root()) {
        Ok(Resolved::Local { path, url }) => AssetItem::file(path, url, position, options, key),
        Ok(Resolved::External(url)) => AssetItem::external(url, position, options, key),
        Err(e) => {
            debug!("collect"; "registered `{}` as pass-through: {}", reference, e);
            AssetItem::external(reference, position, options, key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;
    use crate::config::MinifyConfig;
    use std::fs;
    use tempfile::TempDir;

    fn resolver(dir: &TempDir) -> PathResolver {
        let config = MinifyConfig::new(dir.path(), "");
        PathResolver::new(config.validate().unwrap(), config.schemas)
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut collector = AssetCollector::new();
        collector.register_js("var a=1;", Position::End, None);
        collector.register_js("var b=2;", Position::Head, None);
        collector.register_js("var c=3;", Position::End, None);

        let order: Vec<_> = collector
            .items(ContentType::Js)
            .iter()
            .map(|i| match &i.kind {
                AssetKind::Inline { content } => content.as_str(),
                _ => "",
            })
            .collect();
        assert_eq!(order, vec!["var a=1;", "var b=2;", "var c=3;"]);
    }

    #[test]
    fn test_first_registration_wins() {
        let mut collector = AssetCollector::new();
        collector.register_css("a{}", AssetOptions::new(), Some("theme".into()));
        collector.register_css("b{}", AssetOptions::new(), Some("theme".into()));

        let items = collector.items(ContentType::Css);
        assert_eq!(items.len(), 1);
        assert_eq!(
            items[0].kind,
            AssetKind::Inline {
                content: "a{}".into()
            }
        );
    }

    #[test]
    fn test_identical_inline_content_collapses_via_derived_key() {
        let mut collector = AssetCollector::new();
        collector.register_js("var a=1;", Position::End, None);
        collector.register_js("var a=1;", Position::End, None);
        assert_eq!(collector.items(ContentType::Js).len(), 1);
    }

    #[test]
    fn test_file_registration_resolves() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("js")).unwrap();
        fs::write(dir.path().join("js/app.js"), "var a=1;").unwrap();
        let resolver = resolver(&dir);

        let mut collector = AssetCollector::new();
        collector.register_js_file("/js/app.js", &resolver, Position::End, None);

        match &collector.items(ContentType::Js)[0].kind {
            AssetKind::File { path, url } => {
                assert_eq!(*path, dir.path().join("js/app.js"));
                assert_eq!(url, "/js/app.js");
            }
            other => panic!("expected file item, got {other:?}"),
        }
    }

    #[test]
    fn test_external_reference_stays_external() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver(&dir);

        let mut collector = AssetCollector::new();
        collector.register_css_file(
            "https://cdn.example/x.css",
            &resolver,
            AssetOptions::new(),
            None,
        );
        assert!(matches!(
            collector.items(ContentType::Css)[0].kind,
            AssetKind::External { .. }
        ));
    }
}
