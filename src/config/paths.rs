//! `[paths]` section and centralized path resolution.
//!
//! Every filesystem path in the config is relative to the project root.
//! `PathResolver` is the single place that turns those into absolute
//! filesystem paths and public URLs, and it is handed to every component
//! that needs either.
//!
//! ```text
//! SiteConfig
//!     │
//!     └── paths() → PathResolver
//!                       │
//!                       ├── root_path("assets/css/app.css") → /abs/site/assets/css/app.css
//!                       ├── public_url("assets/css/app.css") → /assets/css/app.css
//!                       └── relative_to_root(abs)            → assets/css/app.css
//! ```

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `[paths]` section in vellum.toml.
///
/// # Example
/// ```toml
/// [paths]
/// styles = "public/css"
/// scripts = "public/js"
/// cache = "var/cache"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Project root. Defaults to the directory holding the config file.
    #[serde(default = "defaults::paths::root", skip_serializing_if = "Option::is_none")]
    #[educe(Default = defaults::paths::root())]
    pub root: Option<PathBuf>,

    /// Base directory for `add_style` paths that are not root-relative.
    #[serde(default = "defaults::paths::styles")]
    #[educe(Default = defaults::paths::styles())]
    pub styles: PathBuf,

    /// Base directory for `add_script` paths that are not root-relative.
    #[serde(default = "defaults::paths::scripts")]
    #[educe(Default = defaults::paths::scripts())]
    pub scripts: PathBuf,

    /// Component templates (header, footer, reusable fragments).
    #[serde(default = "defaults::paths::components")]
    #[educe(Default = defaults::paths::components())]
    pub components: PathBuf,

    /// Page bodies served by `vellum serve`.
    #[serde(default = "defaults::paths::content")]
    #[educe(Default = defaults::paths::content())]
    pub content: PathBuf,

    /// Third-party asset packages searched by `locate_module_asset`.
    #[serde(default = "defaults::paths::modules")]
    #[educe(Default = defaults::paths::modules())]
    pub modules: PathBuf,

    /// Page cache directory.
    #[serde(default = "defaults::paths::cache")]
    #[educe(Default = defaults::paths::cache())]
    pub cache: PathBuf,

    /// Transient store file.
    #[serde(default = "defaults::paths::transients")]
    #[educe(Default = defaults::paths::transients())]
    pub transients: PathBuf,

    /// Subdirectory (under the style/script base) for compressed artifacts.
    #[serde(default = "defaults::paths::min_dir")]
    #[educe(Default = defaults::paths::min_dir())]
    pub min_dir: String,

    /// Default header file, relative to `components`.
    #[serde(default = "defaults::paths::header", skip_serializing_if = "Option::is_none")]
    #[educe(Default = defaults::paths::header())]
    pub header: Option<PathBuf>,

    /// Default footer file, relative to `components`.
    #[serde(default = "defaults::paths::footer", skip_serializing_if = "Option::is_none")]
    #[educe(Default = defaults::paths::footer())]
    pub footer: Option<PathBuf>,
}

/// Resolves root-relative paths to filesystem locations and public URLs.
#[derive(Debug, Clone, Copy)]
pub struct PathResolver<'a> {
    root: &'a Path,
    base_url: &'a str,
}

impl<'a> PathResolver<'a> {
    #[inline]
    pub const fn new(root: &'a Path, base_url: &'a str) -> Self {
        Self { root, base_url }
    }

    #[inline]
    pub const fn root(&self) -> &Path {
        self.root
    }

    /// Absolute filesystem path of a root-relative path.
    ///
    /// A leading `/` is treated as "from the root", not as the filesystem root.
    pub fn root_path<P: AsRef<Path>>(&self, rel: P) -> PathBuf {
        let rel = rel.as_ref();
        let rel = rel.strip_prefix("/").unwrap_or(rel);
        if rel.as_os_str().is_empty() {
            self.root.to_path_buf()
        } else {
            self.root.join(rel)
        }
    }

    /// Public URL for a root-relative path.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // base_url = "/"
    /// paths.public_url("assets/css/app.css") → "/assets/css/app.css"
    ///
    /// // base_url = "https://cdn.example.com/site/"
    /// paths.public_url("favicon.ico") → "https://cdn.example.com/site/favicon.ico"
    /// ```
    pub fn public_url<P: AsRef<Path>>(&self, rel: P) -> String {
        let rel = rel.as_ref().to_string_lossy().replace('\\', "/");
        let rel = rel.trim_start_matches('/');
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/{rel}")
    }

    /// Strip the root from an absolute path.
    pub fn relative_to_root(&self, path: &Path) -> Option<PathBuf> {
        path.strip_prefix(self.root).ok().map(Path::to_path_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::super::SiteConfig;
    use super::*;

    #[test]
    fn test_paths_defaults() {
        let config: SiteConfig = toml::from_str("[paths]").unwrap();

        assert_eq!(config.paths.styles, PathBuf::from("assets/css"));
        assert_eq!(config.paths.scripts, PathBuf::from("assets/js"));
        assert_eq!(config.paths.cache, PathBuf::from("cache/pages"));
        assert_eq!(config.paths.min_dir, "_min");
        assert_eq!(config.paths.header, Some(PathBuf::from("header.html")));
    }

    #[test]
    fn test_root_path_joins_relative() {
        let paths = PathResolver::new(Path::new("/site"), "/");
        assert_eq!(paths.root_path("css/app.css"), PathBuf::from("/site/css/app.css"));
    }

    #[test]
    fn test_root_path_leading_slash_is_root_relative() {
        let paths = PathResolver::new(Path::new("/site"), "/");
        assert_eq!(
            paths.root_path("/node_modules/x/x.js"),
            PathBuf::from("/site/node_modules/x/x.js")
        );
        assert_eq!(paths.root_path(""), PathBuf::from("/site"));
    }

    #[test]
    fn test_public_url_default_base() {
        let paths = PathResolver::new(Path::new("/site"), "/");
        assert_eq!(paths.public_url("assets/css/app.css"), "/assets/css/app.css");
        assert_eq!(paths.public_url("/favicon.ico"), "/favicon.ico");
    }

    #[test]
    fn test_public_url_absolute_base() {
        let paths = PathResolver::new(Path::new("/site"), "https://example.com/blog/");
        assert_eq!(
            paths.public_url("ajax"),
            "https://example.com/blog/ajax"
        );
    }

    #[test]
    fn test_relative_to_root() {
        let paths = PathResolver::new(Path::new("/site"), "/");
        assert_eq!(
            paths.relative_to_root(Path::new("/site/node_modules/a/a.js")),
            Some(PathBuf::from("node_modules/a/a.js"))
        );
        assert_eq!(paths.relative_to_root(Path::new("/other/a.js")), None);
    }
}
