//! The consolidation engine: partition, fingerprint, cache-check,
//! assemble, minify, persist, emit.
//!
//! One engine call handles one content-type for one render pass. Bundles
//! are independent - their fingerprints and contents depend only on their
//! own members - so they are processed in parallel; the emitted order is
//! still exactly the partition order.

mod assemble;
mod bundle;

pub use bundle::{Segment, bundle_fingerprint, member_identity, partition};

use rayon::prelude::*;

use crate::asset::{AssetItem, AssetKind, ContentType};
use crate::config::MinifyConfig;
use crate::error::ConsolidateError;
use crate::freshness::Fingerprint;
use crate::minify::{Minify, wrap_css};
use crate::resolve::PathResolver;
use crate::rewrite::UrlRewriter;
use crate::{debug, log};

/// Final items for one content-type plus surfaced warnings.
pub struct ConsolidateOutput {
    pub items: Vec<AssetItem>,
    pub warnings: Vec<String>,
}

/// Consolidates the registered items of one render pass.
pub struct ConsolidationEngine<'a> {
    config: &'a MinifyConfig,
    resolver: &'a PathResolver,
    fingerprinter: &'a dyn Fingerprint,
    minifier: &'a dyn Minify,
}

impl<'a> ConsolidationEngine<'a> {
    pub fn new(
        config: &'a MinifyConfig,
        resolver: &'a PathResolver,
        fingerprinter: &'a dyn Fingerprint,
        minifier: &'a dyn Minify,
    ) -> Self {
        Self {
            config,
            resolver,
            fingerprinter,
            minifier,
        }
    }

    /// Consolidate the ordered items of one content-type.
    ///
    /// Pure with respect to its inputs: the same ordered item set yields
    /// byte-identical bundle files under the same filenames.
    pub fn consolidate(&self, ty: ContentType, items: Vec<AssetItem>) -> ConsolidateOutput {
        let segments = partition(ty, items, self.config);

        let processed: Vec<(Vec<AssetItem>, Vec<String>)> = segments
            .into_par_iter()
            .map(|segment| match segment {
                Segment::PassThrough(item) => (vec![item], Vec::new()),
                Segment::Bundle(members) => self.process_bundle(ty, members),
            })
            .collect();

        let mut items = Vec::new();
        let mut warnings = Vec::new();
        for (emitted, bundle_warnings) in processed {
            items.extend(emitted);
            warnings.extend(bundle_warnings);
        }
        ConsolidateOutput { items, warnings }
    }

    /// Run one bundle through fingerprint, cache check, assembly,
    /// minification and persistence.
    fn process_bundle(
        &self,
        ty: ContentType,
        members: Vec<AssetItem>,
    ) -> (Vec<AssetItem>, Vec<String>) {
        let mut warnings = Vec::new();

        // Fingerprint members up front; an unresolvable file member is
        // dropped here so it affects neither the name nor the content
        let mut surviving = Vec::with_capacity(members.len());
        let mut identities = Vec::with_capacity(members.len());
        for member in members {
            match member_identity(&member, self.fingerprinter) {
                Some(identity) => {
                    identities.push(identity);
                    surviving.push(member);
                }
                None => {
                    let reference = member_label(&member);
                    let warning = ConsolidateError::path_resolution(
                        &reference,
                        "unreadable, dropped from bundle",
                    )
                    .to_string();
                    log!("warning"; "{}", warning);
                    warnings.push(warning);
                }
            }
        }
        if surviving.is_empty() {
            return (Vec::new(), warnings);
        }

        let fingerprint = bundle_fingerprint(ty, &identities);
        let paths = self.resolver.paths();
        let path = paths
            .minify_dir()
            .join(format!("{fingerprint}.{}", ty.ext()));
        // minify_dir is validated to live under the web root
        let url = paths.url_for(&path).unwrap_or_else(|| fingerprint.clone());

        if path.is_file() {
            debug!("minify"; "cache hit for {}", url);
        } else if let Err(e) = self.materialize(ty, &surviving, &path, &mut warnings) {
            let warning = e.to_string();
            log!("error"; "{}", warning);
            warnings.push(warning);
            // The bundle's items are dropped; sibling bundles are unaffected
            return (Vec::new(), warnings);
        }

        let first = &surviving[0];
        let emitted = AssetItem::file(path, url, first.position, first.options.clone(), None);
        (vec![emitted], warnings)
    }

    /// Assemble, minify and write the bundle file (cache-miss path).
    fn materialize(
        &self,
        ty: ContentType,
        members: &[AssetItem],
        path: &std::path::Path,
        warnings: &mut Vec<String>,
    ) -> Result<(), ConsolidateError> {
        let rewriter = UrlRewriter::new(self.resolver);
        let minify_dir = self.resolver.paths().minify_dir();
        let assembled = assemble::assemble(
            ty,
            members,
            &rewriter,
            minify_dir,
            self.config.expand_imports,
            warnings,
        );

        let minify_enabled = match ty {
            ContentType::Css => self.config.minify_css,
            ContentType::Js => self.config.minify_js,
        } && !minify_disabled_by_options(&members[0]);

        let mut text = assembled.text;
        if minify_enabled {
            match self.minifier.minify(ty, &text) {
                Ok(minified) => text = minified,
                Err(e) => {
                    // Degraded but available: ship the unminified assembly
                    let warning = format!("{e}; writing unminified bundle");
                    log!("warning"; "{}", warning);
                    warnings.push(warning);
                }
            }
        }

        if ty == ContentType::Css {
            text = wrap_css(&text, self.config.css_linebreak_pos);
            let forced = self.config.force_charset.as_deref();
            if let Some(line) = assemble::charset_line(forced, assembled.charset.as_deref()) {
                text.insert_str(0, &line);
            }
        }

        crate::output::write(path, &text, self.config.file_mode)
    }
}

/// Human-readable member name for warnings.
fn member_label(item: &AssetItem) -> String {
    match &item.kind {
        AssetKind::Inline { .. } => format!("inline:{}", item.key),
        AssetKind::File { url, .. } => url.clone(),
        AssetKind::External { url } => url.clone(),
    }
}

/// Pre-minified registrations opt out per item via `minify = "false"`;
/// the differing option already forces them into their own bundle.
fn minify_disabled_by_options(item: &AssetItem) -> bool {
    item.options.get("minify").is_some_and(|v| v == "false")
}
