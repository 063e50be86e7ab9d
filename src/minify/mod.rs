//! Asset minification for JS and CSS bundles.
//!
//! Uses oxc for JavaScript and lightningcss for CSS, behind the pluggable
//! [`Minify`] trait. The consolidation engine treats the minifier as a
//! black box: any failure falls back to the unminified assembly.

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, Minifier, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;

use crate::asset::ContentType;
use crate::error::ConsolidateError;

/// Pluggable `minify(text) -> text` function.
pub trait Minify: Send + Sync {
    fn minify(&self, ty: ContentType, source: &str) -> Result<String, ConsolidateError>;
}

/// Default minifier: oxc for JS, lightningcss for CSS.
pub struct DefaultMinifier;

impl Minify for DefaultMinifier {
    fn minify(&self, ty: ContentType, source: &str) -> Result<String, ConsolidateError> {
        match ty {
            ContentType::Js => minify_js(source),
            ContentType::Css => minify_css(source),
        }
    }
}

/// Minify JavaScript source code.
pub fn minify_js(source: &str) -> Result<String, ConsolidateError> {
    let allocator = Allocator::default();
    let source_type = SourceType::mjs();
    let ret = Parser::new(&allocator, source, source_type).parse();
    if !ret.errors.is_empty() {
        let messages: Vec<String> = ret.errors.iter().map(|e| e.to_string()).collect();
        return Err(ConsolidateError::Minification(messages.join("; ")));
    }
    let mut program = ret.program;
    let options = MinifierOptions {
        mangle: Some(MangleOptions::default()),
        compress: Some(CompressOptions::smallest()),
    };
    let ret = Minifier::new(options).minify(&allocator, &mut program);
    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            comments: CommentOptions::disabled(),
            ..CodegenOptions::default()
        })
        .with_scoping(ret.scoping)
        .build(&program)
        .code;
    Ok(code)
}

/// Minify CSS source code.
pub fn minify_css(source: &str) -> Result<String, ConsolidateError> {
    let mut stylesheet = StyleSheet::parse(source, ParserOptions::default())
        .map_err(|e| ConsolidateError::Minification(e.to_string()))?;
    stylesheet
        .minify(MinifyOptions::default())
        .map_err(|e| ConsolidateError::Minification(e.to_string()))?;
    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..PrinterOptions::default()
        })
        .map_err(|e| ConsolidateError::Minification(e.to_string()))?;
    Ok(result.code)
}

/// Insert a line break at the first rule edge after every `pos` characters.
///
/// Keeps generated CSS diff-friendly instead of one pathological line;
/// breaking only after `}` never changes semantics.
pub fn wrap_css(css: &str, pos: usize) -> String {
    if pos == 0 {
        return css.to_string();
    }

    let mut out = String::with_capacity(css.len() + css.len() / pos + 1);
    let mut since_break = 0usize;
    for c in css.chars() {
        out.push(c);
        if c == '\n' {
            since_break = 0;
            continue;
        }
        since_break += 1;
        if c == '}' && since_break >= pos {
            out.push('\n');
            since_break = 0;
        }
    }
    out
}
