//! Default values for configuration fields.
//!
//! These functions are used by serde for default deserialization.

// ============================================================================
// [site] Section Defaults
// ============================================================================

pub mod site {
    pub fn app_name() -> String {
        "vellum".into()
    }

    pub fn base_url() -> String {
        "/".into()
    }

    pub fn language() -> String {
        "en".into()
    }

    pub fn charset() -> String {
        "UTF-8".into()
    }

    pub fn ajax_endpoint() -> String {
        "ajax".into()
    }
}

// ============================================================================
// [paths] Section Defaults
// ============================================================================

pub mod paths {
    use std::path::PathBuf;

    pub fn root() -> Option<PathBuf> {
        None
    }

    pub fn styles() -> PathBuf {
        "assets/css".into()
    }

    pub fn scripts() -> PathBuf {
        "assets/js".into()
    }

    pub fn components() -> PathBuf {
        "components".into()
    }

    pub fn content() -> PathBuf {
        "content".into()
    }

    pub fn modules() -> PathBuf {
        "node_modules".into()
    }

    pub fn cache() -> PathBuf {
        "cache/pages".into()
    }

    pub fn transients() -> PathBuf {
        "cache/transients.json".into()
    }

    pub fn min_dir() -> String {
        "_min".into()
    }

    pub fn header() -> Option<PathBuf> {
        Some("header.html".into())
    }

    pub fn footer() -> Option<PathBuf> {
        Some("footer.html".into())
    }
}

// ============================================================================
// [cache] Section Defaults
// ============================================================================

pub mod cache {
    pub fn clear_current() -> String {
        "clear_cache".into()
    }

    pub fn clear_all() -> String {
        "clear_all_cache".into()
    }
}

// ============================================================================
// [page] Section Defaults
// ============================================================================

pub mod page {
    pub fn module_extension() -> String {
        "min.js".into()
    }
}

// ============================================================================
// [serve] Section Defaults
// ============================================================================

pub mod serve {
    pub fn interface() -> String {
        "127.0.0.1".into()
    }

    pub fn port() -> u16 {
        5277
    }
}
