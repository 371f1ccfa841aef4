//! `[page]` section configuration.
//!
//! The default page setup applied to every document rendered by the CLI and
//! the development server. Library callers can ignore it and configure the
//! assembler programmatically.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[page]` section in vellum.toml.
///
/// # Example
/// ```toml
/// [page]
/// title = "Home"
/// favicon = "favicon.ico"
/// minify = true
/// metas = ['name="theme-color" content="black"']
/// styles = ["styles.css"]
/// compress = true
///
/// [[page.cdns]]
/// kind = "link"
/// attributes = 'rel="preconnect" href="https://fonts.googleapis.com"'
///
/// [[page.hooks]]
/// name = "top_body"
/// content = "<noscript>enable js</noscript>"
/// priority = 10
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PageConfig {
    /// Page title. The site `app_name` is used when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Favicon path, relative to the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,

    /// Minify the assembled document.
    #[serde(default)]
    pub minify: bool,

    /// Raw `<meta>` attribute strings.
    #[serde(default)]
    pub metas: Vec<String>,

    /// External `<link>`/`<script>` tags.
    #[serde(default)]
    pub cdns: Vec<CdnEntry>,

    /// Stylesheets, relative to `[paths].styles`.
    #[serde(default)]
    pub styles: Vec<String>,

    /// Scripts, relative to `[paths].scripts`.
    #[serde(default)]
    pub scripts: Vec<String>,

    /// Compress styles and scripts into `[paths].min_dir` before adding them.
    #[serde(default)]
    pub compress: bool,

    /// Third-party module assets to locate and add.
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,

    /// Render the default header component.
    #[serde(default)]
    pub header: bool,

    /// Render the default footer component.
    #[serde(default)]
    pub footer: bool,

    /// JavaScript variable receiving the ajax endpoint URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ajax_var: Option<String>,

    /// Hook registrations.
    #[serde(default)]
    pub hooks: Vec<HookEntry>,
}

/// A `[[page.cdns]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CdnEntry {
    /// `link` or `script`.
    pub kind: String,
    pub attributes: String,
}

/// A `[[page.modules]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModuleEntry {
    pub name: String,

    /// Extension suffix to search for, e.g. `min.js` or `css`.
    #[serde(default = "defaults::page::module_extension")]
    pub extension: String,

    #[serde(default)]
    pub attributes: String,
}

/// A `[[page.hooks]]` entry. Exactly one of `content` and `file` must be set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HookEntry {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Template file, relative to the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    #[serde(default)]
    pub priority: i32,
}
