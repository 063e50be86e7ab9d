//! Registered asset items.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::utils::hash;

/// Content type of a registered asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Css,
    Js,
}

impl ContentType {
    /// Output file extension for bundle files.
    pub fn ext(self) -> &'static str {
        match self {
            ContentType::Css => "css",
            ContentType::Js => "js",
        }
    }

    /// Separator inserted between concatenated members.
    ///
    /// JS statements need a newline boundary (a member may end without a
    /// semicolon); CSS rules concatenate plainly.
    pub fn separator(self) -> &'static str {
        match self {
            ContentType::Css => "",
            ContentType::Js => "\n",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Css => "css",
            ContentType::Js => "js",
        }
    }
}

/// Free-form attributes attached at registration time.
///
/// A `BTreeMap` keeps iteration deterministic so two items with the same
/// options always produce the same grouping signature.
pub type AssetOptions = BTreeMap<String, String>;

/// The payload of a registered asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetKind {
    /// A raw text fragment captured or registered inline.
    Inline { content: String },
    /// A file under the web root, addressable on disk and by public URL.
    File { path: PathBuf, url: String },
    /// A reference outside the resolver's authority; emitted untouched.
    External { url: String },
}

/// One registered piece of CSS or JS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetItem {
    pub kind: AssetKind,
    pub position: super::Position,
    pub options: AssetOptions,
    /// Deduplication identity; within one pass, first registration wins.
    pub key: String,
}

impl AssetItem {
    pub fn inline(
        content: impl Into<String>,
        position: super::Position,
        options: AssetOptions,
        key: Option<String>,
    ) -> Self {
        let content = content.into();
        let key = key.unwrap_or_else(|| hash::fingerprint(&content));
        Self {
            kind: AssetKind::Inline { content },
            position,
            options,
            key,
        }
    }

    pub fn file(
        path: PathBuf,
        url: impl Into<String>,
        position: super::Position,
        options: AssetOptions,
        key: Option<String>,
    ) -> Self {
        let url = url.into();
        let key = key.unwrap_or_else(|| hash::fingerprint(&url));
        Self {
            kind: AssetKind::File { path, url },
            position,
            options,
            key,
        }
    }

    pub fn external(
        url: impl Into<String>,
        position: super::Position,
        options: AssetOptions,
        key: Option<String>,
    ) -> Self {
        let url = url.into();
        let key = key.unwrap_or_else(|| hash::fingerprint(&url));
        Self {
            kind: AssetKind::External { url },
            position,
            options,
            key,
        }
    }

    /// Signature that decides run boundaries: position plus the full
    /// options set (for CSS this carries the `media` query).
    pub fn group_signature(&self) -> String {
        let mut sig = String::from(self.position.as_str());
        for (name, value) in &self.options {
            sig.push(';');
            sig.push_str(name);
            sig.push('=');
            sig.push_str(value);
        }
        sig
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::Position;

    #[test]
    fn test_derived_key_from_content() {
        let a = AssetItem::inline("alert(1)", Position::End, AssetOptions::new(), None);
        let b = AssetItem::inline("alert(1)", Position::End, AssetOptions::new(), None);
        assert_eq!(a.key, b.key);

        let c = AssetItem::inline("alert(2)", Position::End, AssetOptions::new(), None);
        assert_ne!(a.key, c.key);
    }

    #[test]
    fn test_explicit_key_wins() {
        let item = AssetItem::inline(
            "alert(1)",
            Position::End,
            AssetOptions::new(),
            Some("app-boot".into()),
        );
        assert_eq!(item.key, "app-boot");
    }

    #[test]
    fn test_group_signature_includes_media() {
        let mut options = AssetOptions::new();
        options.insert("media".into(), "print".into());
        let with_media = AssetItem::inline("a{}", Position::Head, options, None);
        let plain = AssetItem::inline("a{}", Position::Head, AssetOptions::new(), None);
        assert_ne!(with_media.group_signature(), plain.group_signature());
    }

    #[test]
    fn test_group_signature_deterministic_option_order() {
        let mut first = AssetOptions::new();
        first.insert("media".into(), "screen".into());
        first.insert("data-x".into(), "1".into());
        let mut second = AssetOptions::new();
        second.insert("data-x".into(), "1".into());
        second.insert("media".into(), "screen".into());

        let a = AssetItem::inline("a{}", Position::Head, first, None);
        let b = AssetItem::inline("a{}", Position::Head, second, None);
        assert_eq!(a.group_signature(), b.group_signature());
    }
}
