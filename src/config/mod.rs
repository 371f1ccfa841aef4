//! Site configuration management for `vellum.toml`.
//!
//! # Sections
//!
//! | Section     | Purpose                                          |
//! |-------------|--------------------------------------------------|
//! | `[site]`    | App name, base URL, production/debug gates       |
//! | `[paths]`   | Asset, component, cache and transient locations  |
//! | `[cache]`   | Page cache switch and bypass query keys          |
//! | `[page]`    | Default page setup for CLI/server rendering      |
//! | `[serve]`   | Development server (port, interface)             |
//! | `[extra]`   | User-defined custom fields                       |
//!
//! # Example
//!
//! ```toml
//! [site]
//! app_name = "My Site"
//! production = true
//!
//! [cache]
//! enable = true
//!
//! [page]
//! minify = true
//! styles = ["styles.css"]
//!
//! [extra]
//! analytics_id = "UA-12345"
//! ```

mod cache;
pub mod defaults;
mod error;
mod page;
mod paths;
mod serve;
mod site;

pub use cache::CacheConfig;
pub use error::ConfigError;
pub use page::{CdnEntry, HookEntry, ModuleEntry, PageConfig};
pub use paths::{PathResolver, PathsConfig};
pub use serve::ServeConfig;
pub use site::SiteSection;

use crate::cli::Cli;
use anyhow::{Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing vellum.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Application identity and visibility gates
    #[serde(default)]
    pub site: SiteSection,

    /// Filesystem layout
    #[serde(default)]
    pub paths: PathsConfig,

    /// Page cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Default page setup
    #[serde(default)]
    pub page: PageConfig,

    /// Development server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// User-defined extra fields
    #[serde(default)]
    pub extra: HashMap<String, toml::Value>,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.paths.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.paths.root = Some(path.to_path_buf());
    }

    /// Path resolution capability bound to this config's root and base URL.
    pub fn paths(&self) -> PathResolver<'_> {
        PathResolver::new(self.get_root(), &self.site.base_url)
    }

    /// Look up a value by dotted key, e.g. `site.app_name` or `extra.analytics_id`.
    pub fn get(&self, key: &str) -> Option<toml::Value> {
        let mut value = toml::Value::try_from(self).ok()?;
        for part in key.split('.') {
            value = match value {
                toml::Value::Table(mut table) => table.remove(part)?,
                _ => return None,
            };
        }
        Some(value)
    }

    /// Flatten all scalar settings into sorted `(dotted.key, value)` pairs.
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        if let Ok(value) = toml::Value::try_from(self) {
            flatten_value("", &value, &mut entries);
        }
        entries.sort();
        entries
    }

    /// Update configuration with CLI arguments
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let root = cli
            .root
            .as_ref()
            .cloned()
            .or_else(|| self.paths.root.clone())
            .unwrap_or_else(|| {
                self.config_path
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("./"))
            });
        let root = Self::normalize_path(&root);
        self.set_root(&root);

        Self::update_option(&mut self.site.production, cli.production.as_ref());
        Self::update_option(&mut self.site.debug, cli.debug.as_ref());
        Self::update_option(&mut self.page.minify, cli.minify.as_ref());
    }

    /// Update config option if CLI value is provided
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Normalize a path to absolute, using canonicalize if the path exists
    fn normalize_path(path: &Path) -> PathBuf {
        path.canonicalize().unwrap_or_else(|_| {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                std::env::current_dir()
                    .map(|cwd| cwd.join(path))
                    .unwrap_or_else(|_| path.to_path_buf())
            }
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.site.base_url.is_empty() {
            bail!(ConfigError::invalid("site", "base_url", "must not be empty"));
        }

        if self.paths.min_dir.is_empty() || self.paths.min_dir.contains(['/', '\\']) {
            bail!(ConfigError::invalid("paths", "min_dir", "must be a single directory name"));
        }

        if self.cache.clear_current.is_empty() {
            bail!(ConfigError::invalid("cache", "clear_current", "must not be empty"));
        }
        if self.cache.clear_all.is_empty() {
            bail!(ConfigError::invalid("cache", "clear_all", "must not be empty"));
        }

        for hook in &self.page.hooks {
            let reason = match (&hook.content, &hook.file) {
                (Some(_), Some(_)) => "sets both `content` and `file`",
                (None, None) => "needs `content` or `file`",
                _ => continue,
            };
            bail!(ConfigError::HookSource {
                name: hook.name.clone(),
                reason,
            });
        }

        Ok(())
    }
}

fn flatten_value(prefix: &str, value: &toml::Value, out: &mut Vec<(String, String)>) {
    match value {
        toml::Value::Table(table) => {
            for (key, value) in table {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten_value(&key, value, out);
            }
        }
        toml::Value::String(s) => out.push((prefix.to_owned(), s.clone())),
        other => out.push((prefix.to_owned(), other.to_string())),
    }
}

// ============================================================================
// Tests
// ============================================================================
