//! `[cache]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[cache]` section in vellum.toml - full-page cache and bypass controls.
///
/// A bypass fires when the request carries a query parameter whose name
/// and value both equal the configured key, e.g. `?clear_cache=clear_cache`.
///
/// # Example
/// ```toml
/// [cache]
/// enable = true
/// clear_current = "flush"
/// clear_all = "flush_everything"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Default caching state for new documents.
    #[serde(default)]
    pub enable: bool,

    /// Query key that purges the current page before the cache check.
    #[serde(default = "defaults::cache::clear_current")]
    #[educe(Default = defaults::cache::clear_current())]
    pub clear_current: String,

    /// Query key that purges every cached page before the cache check.
    #[serde(default = "defaults::cache::clear_all")]
    #[educe(Default = defaults::cache::clear_all())]
    pub clear_all: String,
}
