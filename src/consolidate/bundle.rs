//! Run partitioning and bundle identity.

use crate::asset::{AssetItem, AssetKind, ContentType};
use crate::config::MinifyConfig;
use crate::freshness::Fingerprint;

/// One partition of the ordered item list.
#[derive(Debug)]
pub enum Segment {
    /// A contiguous run merged into one output file.
    Bundle(Vec<AssetItem>),
    /// Emitted exactly as registered, in place: external references and
    /// JS positions outside the configured consolidation set.
    PassThrough(AssetItem),
}

/// Partition items into bundles and pass-throughs.
///
/// Walks in registration order; a new bundle starts whenever the group
/// signature (position + options) changes. With concatenation disabled for
/// the type every eligible item becomes its own singleton bundle - still
/// minified and relocated, just not merged.
pub fn partition(ty: ContentType, items: Vec<AssetItem>, config: &MinifyConfig) -> Vec<Segment> {
    let concat = match ty {
        ContentType::Css => config.concat_css,
        ContentType::Js => config.concat_js,
    };

    let mut segments = Vec::new();
    let mut run: Vec<AssetItem> = Vec::new();
    let mut run_signature = String::new();

    for item in items {
        let eligible = match ty {
            ContentType::Css => !matches!(item.kind, AssetKind::External { .. }),
            ContentType::Js => {
                !matches!(item.kind, AssetKind::External { .. })
                    && config.js_position.contains(&item.position)
            }
        };

        if !eligible {
            if !run.is_empty() {
                segments.push(Segment::Bundle(std::mem::take(&mut run)));
            }
            segments.push(Segment::PassThrough(item));
            continue;
        }

        let signature = item.group_signature();
        if !concat || (!run.is_empty() && signature != run_signature) {
            if !run.is_empty() {
                segments.push(Segment::Bundle(std::mem::take(&mut run)));
            }
        }
        run_signature = signature;
        run.push(item);
    }

    if !run.is_empty() {
        segments.push(Segment::Bundle(run));
    }
    segments
}

/// Identity of one member inside a bundle fingerprint.
///
/// Inline content hashes directly; file members defer to the configured
/// fingerprint strategy. `None` marks an unreadable file member.
pub fn member_identity(item: &AssetItem, fingerprinter: &dyn Fingerprint) -> Option<String> {
    match &item.kind {
        AssetKind::Inline { content } => {
            Some(blake3::hash(content.as_bytes()).to_hex().to_string())
        }
        AssetKind::File { path, .. } => fingerprinter.fingerprint(path),
        AssetKind::External { .. } => None,
    }
}

/// Combine member identities into the bundle fingerprint.
///
/// Count and type are mixed in, and every identity is length-prefixed, so
/// inserting, removing, reordering or editing any member changes the
/// resulting output filename.
pub fn bundle_fingerprint(ty: ContentType, identities: &[String]) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(ty.as_str().as_bytes());
    hasher.update(&(identities.len() as u64).to_le_bytes());
    for identity in identities {
        hasher.update(&(identity.len() as u64).to_le_bytes());
        hasher.update(identity.as_bytes());
    }
    hasher.finalize().to_hex()[..16].to_string()
}
