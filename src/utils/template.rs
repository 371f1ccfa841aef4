//! Literal variable-bag substitution for component and hook templates.
//!
//! `{{ name }}` is replaced by the value bound to `name`; unknown names
//! render as the empty string. There is no logic, looping or escaping:
//! values are inserted verbatim.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;

/// Variables available to a template.
pub type Variables = BTreeMap<String, String>;

static RE_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").unwrap());

/// Substitute `{{ name }}` placeholders in `text`.
pub fn render(text: &str, vars: &Variables) -> String {
    RE_PLACEHOLDER
        .replace_all(text, |caps: &Captures| {
            vars.get(&caps[1]).cloned().unwrap_or_default()
        })
        .into_owned()
}

/// Read a template file and substitute its placeholders.
pub fn render_file(path: &Path, vars: &Variables) -> io::Result<String> {
    let text = fs::read_to_string(path)?;
    Ok(render(&text, vars))
}

/// Escape text for use inside HTML element content or quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Build a variable bag from string pairs.
pub fn vars<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Variables {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}
