//! Minification for assembled documents and for style/script artifacts.
//!
//! Provides a unified `minify` function; callers pass whether minification
//! is enabled so the disabled path is a zero-copy borrow.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

// ============================================================================
// Types
// ============================================================================

/// Content type for minification.
pub enum MinifyType<'a> {
    /// HTML document or fragment
    Html(&'a str),
    /// Stylesheet or script source
    Asset(&'a str),
}

// ============================================================================
// Unified Minify Function
// ============================================================================

/// Minify content based on type.
///
/// Returns `Cow::Borrowed` if minify is disabled, `Cow::Owned` if minified.
pub fn minify<'a>(content: MinifyType<'a>, enabled: bool) -> Cow<'a, str> {
    match (content, enabled) {
        (MinifyType::Html(html), false) => Cow::Borrowed(html),
        (MinifyType::Asset(source), false) => Cow::Borrowed(source),
        (MinifyType::Html(html), true) => Cow::Owned(minify_html_inner(html)),
        (MinifyType::Asset(source), true) => Cow::Owned(minify_asset_inner(source)),
    }
}

// ============================================================================
// Internal Implementation
// ============================================================================

static RE_HTML_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static RE_BETWEEN_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r">\s+<").unwrap());

static RE_LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^:])//[^\n\r]*").unwrap());
static RE_BLOCK_COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
static RE_AROUND_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*([{}:;,=()])\s*").unwrap());
static RE_TRAILING_SEMI: LazyLock<Regex> = LazyLock::new(|| Regex::new(r";\s*\}").unwrap());

/// Strip comments, collapse whitespace, drop whitespace between tags.
///
/// Comment removal runs to a fixed point so that the result is stable
/// under a second pass (`<!<!-- a -->-- b -->` would otherwise leave a
/// fresh comment behind).
fn minify_html_inner(html: &str) -> String {
    let mut text = html.to_owned();
    while RE_HTML_COMMENT.is_match(&text) {
        text = RE_HTML_COMMENT.replace_all(&text, "").into_owned();
    }
    let text = RE_WHITESPACE.replace_all(&text, " ");
    RE_BETWEEN_TAGS.replace_all(&text, "><").into_owned()
}

/// Rule set for CSS/JS: comments, whitespace around punctuation, `;}`.
///
/// `//` preceded by `:` is kept so that `url(https://...)` survives.
fn minify_asset_inner(source: &str) -> String {
    let text = RE_LINE_COMMENT.replace_all(source, "$1");
    let text = RE_BLOCK_COMMENT.replace_all(&text, "");
    let text = RE_AROUND_PUNCT.replace_all(&text, "$1");
    let text = RE_TRAILING_SEMI.replace_all(&text, "}");
    RE_WHITESPACE.replace_all(&text, " ").trim().to_owned()
}

// ============================================================================
// Tests
// ============================================================================
