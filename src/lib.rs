//! viewmin - asset consolidation for server-rendered views.
//!
//! Collects the CSS/JS fragments and file assets registered while a page
//! renders, then concatenates and minifies them into cache-busted static
//! files before the response is flushed. The host view layer feeds an
//! [`AssetCollector`] into [`MinifyPipeline::finish`] at end-of-body time
//! and emits the returned asset list in place of the raw registrations.

pub mod asset;
pub mod collect;
pub mod config;
pub mod consolidate;
pub mod error;
pub mod freshness;
pub mod logger;
pub mod minify;
pub mod output;
pub mod pipeline;
pub mod resolve;
pub mod rewrite;
pub mod utils;

pub use asset::{AssetItem, AssetKind, AssetOptions, ContentType, Position};
pub use collect::{AssetCollector, CaptureStack};
pub use config::{ConfigError, FileCheck, MinifyConfig, Paths};
pub use consolidate::{ConsolidateOutput, ConsolidationEngine};
pub use error::ConsolidateError;
pub use freshness::Fingerprint;
pub use minify::{DefaultMinifier, Minify};
pub use pipeline::{MinifyPipeline, PageAssets, RegisteredBundle};
pub use resolve::{PathResolver, Resolved};
pub use rewrite::UrlRewriter;
