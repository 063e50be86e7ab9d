//! Placement classes for registered assets.

use serde::Deserialize;

/// Where a registered asset is emitted in the page.
///
/// CSS is always `Head`; JS may target any class. Only the classes listed
/// in `js_position` are eligible for JS consolidation - items elsewhere
/// pass through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    /// In the `<head>` section.
    Head,
    /// Right after the opening `<body>` tag.
    Begin,
    /// Right before the closing `</body>` tag.
    #[default]
    End,
    /// Wrapped in a DOM-ready handler at end of body.
    Ready,
    /// Wrapped in a window load handler at end of body.
    Load,
}

impl Position {
    /// Stable name used in grouping signatures and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Head => "head",
            Position::Begin => "begin",
            Position::End => "end",
            Position::Ready => "ready",
            Position::Load => "load",
        }
    }
}
