//! The post-render pipeline stage.
//!
//! The host view layer calls [`MinifyPipeline::finish`] once per render
//! pass, at end-of-body time, with the collector and the asset-bundle file
//! references the framework resolved for the page. Bundles named in
//! `exclude_bundles` bypass consolidation and are emitted verbatim after
//! the consolidated output; everything else joins the collector before the
//! engine runs.

use crate::asset::{AssetItem, AssetOptions, ContentType, Position};
use crate::collect::AssetCollector;
use crate::config::{ConfigError, MinifyConfig};
use crate::consolidate::ConsolidationEngine;
use crate::freshness::{self, Fingerprint};
use crate::minify::{DefaultMinifier, Minify};
use crate::resolve::PathResolver;

/// File references contributed by one framework asset bundle.
#[derive(Debug, Clone, Default)]
pub struct RegisteredBundle {
    /// Bundle identifier, matched against `exclude_bundles`.
    pub id: String,
    /// CSS file references (public URLs or web-root paths).
    pub css: Vec<String>,
    /// JS file references.
    pub js: Vec<String>,
    /// Placement for the bundle's JS files.
    pub js_position: Position,
    /// Options attached to the bundle's CSS files (e.g. `media`).
    pub css_options: AssetOptions,
}

/// Final per-type output of one render pass.
pub struct PageAssets {
    pub css: Vec<AssetItem>,
    pub js: Vec<AssetItem>,
    pub warnings: Vec<String>,
}

/// Long-lived pipeline instance: validated config plus the collaborators
/// built from it. Construct once at application startup.
pub struct MinifyPipeline {
    config: MinifyConfig,
    resolver: PathResolver,
    fingerprinter: Box<dyn Fingerprint>,
    minifier: Box<dyn Minify>,
}

impl MinifyPipeline {
    /// Validate the config and build the pipeline.
    ///
    /// The only fallible step of the whole lifecycle: an unusable minify
    /// directory aborts here, nothing later is allowed to.
    pub fn new(config: MinifyConfig) -> Result<Self, ConfigError> {
        let paths = config.validate()?;
        let resolver = PathResolver::new(paths, config.schemas.clone());
        let fingerprinter = freshness::for_algorithm(config.file_check_algorithm);
        Ok(Self {
            config,
            resolver,
            fingerprinter,
            minifier: Box::new(DefaultMinifier),
        })
    }

    /// Swap the minifier implementation (testing, custom tooling).
    pub fn with_minifier(mut self, minifier: Box<dyn Minify>) -> Self {
        self.minifier = minifier;
        self
    }

    /// Swap the fingerprint strategy (testing).
    pub fn with_fingerprinter(mut self, fingerprinter: Box<dyn Fingerprint>) -> Self {
        self.fingerprinter = fingerprinter;
        self
    }

    /// The resolver, for registering file references on a collector.
    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    pub fn config(&self) -> &MinifyConfig {
        &self.config
    }

    /// Consolidate one render pass.
    pub fn finish(&self, collector: AssetCollector, bundles: &[RegisteredBundle]) -> PageAssets {
        let mut collector = collector;
        let (included, excluded): (Vec<_>, Vec<_>) = bundles
            .iter()
            .partition(|b| !self.config.exclude_bundles.contains(&b.id));

        for bundle in included {
            self.register_bundle(&mut collector, bundle);
        }

        let (css, js) = collector.into_parts();

        let (mut css, mut js, warnings) = if self.config.enable_minify {
            let engine = ConsolidationEngine::new(
                &self.config,
                &self.resolver,
                self.fingerprinter.as_ref(),
                self.minifier.as_ref(),
            );
            let css_out = engine.consolidate(ContentType::Css, css);
            let js_out = engine.consolidate(ContentType::Js, js);
            let mut warnings = css_out.warnings;
            warnings.extend(js_out.warnings);
            (css_out.items, js_out.items, warnings)
        } else {
            (css, js, Vec::new())
        };

        // Excluded bundles are emitted as given, after consolidated output
        let mut tail = AssetCollector::new();
        for bundle in excluded {
            self.register_bundle(&mut tail, bundle);
        }
        let (tail_css, tail_js) = tail.into_parts();
        css.extend(tail_css);
        js.extend(tail_js);

        PageAssets { css, js, warnings }
    }

    fn register_bundle(&self, collector: &mut AssetCollector, bundle: &RegisteredBundle) {
        for reference in &bundle.css {
            collector.register_css_file(
                reference,
                &self.resolver,
                bundle.css_options.clone(),
                None,
            );
        }
        for reference in &bundle.js {
            collector.register_js_file(reference, &self.resolver, bundle.js_position, None);
        }
    }
}
