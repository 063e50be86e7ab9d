//! Scoped capture of raw `<script>`/`<style>` markup.
//!
//! Lets a page author keep inline JS/CSS highlighted and readable in their
//! editor: wrap it in real tags between `begin_*` and `end_*`, and the
//! wrapping tag pair is stripped before the inner text registers with the
//! collector. An explicit stack owned by the caller replaces ambient
//! output-buffer state.

use super::AssetCollector;
use crate::asset::{AssetOptions, Position};
use crate::log;

enum FrameKind {
    Js(Position),
    Css(AssetOptions),
}

struct Frame {
    kind: FrameKind,
    key: Option<String>,
    buf: String,
}

/// Stack of open capture scopes. Scopes may nest; `end_*` closes the
/// innermost one.
#[derive(Default)]
pub struct CaptureStack {
    frames: Vec<Frame>,
}

impl CaptureStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start buffering a JS block.
    pub fn begin_js(&mut self, position: Position, key: Option<String>) {
        self.frames.push(Frame {
            kind: FrameKind::Js(position),
            key,
            buf: String::new(),
        });
    }

    /// Start buffering a CSS block.
    pub fn begin_css(&mut self, options: AssetOptions, key: Option<String>) {
        self.frames.push(Frame {
            kind: FrameKind::Css(options),
            key,
            buf: String::new(),
        });
    }

    /// Append rendered markup to the innermost open scope.
    pub fn write(&mut self, markup: &str) {
        match self.frames.last_mut() {
            Some(frame) => frame.buf.push_str(markup),
            None => log!("warning"; "capture write without an open scope ignored"),
        }
    }

    /// Close the innermost scope and register its content as JS.
    pub fn end_js(&mut self, collector: &mut AssetCollector) {
        let Some(frame) = self.frames.pop() else {
            log!("warning"; "end_js without begin_js ignored");
            return;
        };
        let FrameKind::Js(position) = frame.kind else {
            log!("warning"; "end_js closed a CSS capture scope; dropped");
            return;
        };
        let inner = strip_tag_pair(&frame.buf, "script");
        collector.register_js(inner, position, frame.key);
    }

    /// Close the innermost scope and register its content as CSS.
    pub fn end_css(&mut self, collector: &mut AssetCollector) {
        let Some(frame) = self.frames.pop() else {
            log!("warning"; "end_css without begin_css ignored");
            return;
        };
        let FrameKind::Css(options) = frame.kind else {
            log!("warning"; "end_css closed a JS capture scope; dropped");
            return;
        };
        let inner = strip_tag_pair(&frame.buf, "style");
        collector.register_css(inner, options, frame.key);
    }
}

/// Strip one wrapping `<tag ...>` / `</tag>` pair, best-effort.
///
/// Tolerant delimiter scan, not an HTML parser: the first opening tag
/// (attributes allowed) and the last closing tag are removed; when either
/// is missing the text is returned trimmed, as-is.
fn strip_tag_pair(text: &str, tag: &str) -> String {
    let open_marker = format!("<{tag}");
    let close_marker = format!("</{tag}");

    let inner = (|| {
        let open_at = find_ascii_ci(text, &open_marker, 0)?;
        // The opening marker must end a tag name: `<style>` or `<style ...>`
        let after = text.as_bytes().get(open_at + open_marker.len())?;
        if !after.is_ascii_whitespace() && *after != b'>' {
            return None;
        }
        let open_end = open_at + text[open_at..].find('>')?;

        let close_at = rfind_ascii_ci(text, &close_marker, open_end + 1)?;
        Some(&text[open_end + 1..close_at])
    })();

    inner.unwrap_or(text).trim().to_string()
}

/// First ASCII-case-insensitive occurrence of `needle` at or after `from`.
fn find_ascii_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|w| w.eq_ignore_ascii_case(needle))
        .map(|i| i + from)
}

/// Last ASCII-case-insensitive occurrence of `needle` at or after `from`.
fn rfind_ascii_ci(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let bytes = haystack.as_bytes();
    let needle = needle.as_bytes();
    bytes
        .get(from..)?
        .windows(needle.len())
        .rposition(|w| w.eq_ignore_ascii_case(needle))
        .map(|i| i + from)
}
