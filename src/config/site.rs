//! `[site]` section configuration.
//!
//! Application identity and the two visibility gates (production, debug).

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[site]` section in vellum.toml.
///
/// # Example
/// ```toml
/// [site]
/// app_name = "My Site"
/// base_url = "https://example.com/"
/// production = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteSection {
    /// Fallback `<title>` when a page sets none.
    #[serde(default = "defaults::site::app_name")]
    #[educe(Default = defaults::site::app_name())]
    pub app_name: String,

    /// Prefix for every public URL the assembler emits.
    #[serde(default = "defaults::site::base_url")]
    #[educe(Default = defaults::site::base_url())]
    pub base_url: String,

    /// Default `lang` attribute of `<html>`.
    #[serde(default = "defaults::site::language")]
    #[educe(Default = defaults::site::language())]
    pub language: String,

    /// Default `<meta charset>`.
    #[serde(default = "defaults::site::charset")]
    #[educe(Default = defaults::site::charset())]
    pub charset: String,

    /// Serve cached pages and hide the diagnostics overlay.
    #[serde(default)]
    pub production: bool,

    /// Append the diagnostics overlay (ignored in production).
    #[serde(default)]
    pub debug: bool,

    /// Endpoint exposed to scripts by `set_ajax_url`, relative to `base_url`.
    #[serde(default = "defaults::site::ajax_endpoint")]
    #[educe(Default = defaults::site::ajax_endpoint())]
    pub ajax_endpoint: String,
}

impl SiteSection {
    /// Whether the diagnostics overlay should be rendered.
    pub const fn diagnostics_enabled(&self) -> bool {
        self.debug && !self.production
    }
}
