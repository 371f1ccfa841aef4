//! Style and script resources for the document head.
//!
//! Resources are validated against the filesystem when they are added:
//! a missing or empty file is reported and never reaches the document.
//!
//! ```text
//! add_style("app.css")           ─┐
//! add_script("app.js")            ├─▶ styles / scripts (registration order)
//! locate_module_asset("jquery")  ─┘          │
//!                                            ▼
//!                          render_styles() / render_scripts()
//!
//! compress("app.css") ─▶ <styles>/_min/app.min.css (rewritten only on change)
//! ```

mod compress;
mod modules;

use crate::config::{PathResolver, SiteConfig};
use crate::error::{Warning, Warnings};
use std::fs;
use std::path::{Path, PathBuf};

/// Kind of a head resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Style,
    Script,
}

impl ResourceKind {
    /// Resource kind for a file extension (`css` or `js`).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "css" => Some(Self::Style),
            "js" => Some(Self::Script),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Style => "stylesheet",
            Self::Script => "script",
        }
    }
}

/// Extra attributes for a resource tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Attributes {
    #[default]
    None,
    /// Literal attribute text, e.g. `media="print" defer`.
    Raw(String),
    /// Ordered `key="value"` pairs.
    Map(Vec<(String, String)>),
}

impl Attributes {
    /// Render with a leading space, or as the empty string if there is nothing to add.
    pub fn render(&self) -> String {
        match self {
            Self::None => String::new(),
            Self::Raw(raw) if raw.trim().is_empty() => String::new(),
            Self::Raw(raw) => format!(" {}", raw.trim()),
            Self::Map(pairs) => pairs
                .iter()
                .map(|(key, value)| format!(" {key}=\"{value}\""))
                .collect(),
        }
    }
}

impl From<&str> for Attributes {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_owned())
    }
}

impl From<String> for Attributes {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<Vec<(String, String)>> for Attributes {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self::Map(pairs)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for Attributes {
    fn from(pairs: [(&str, &str); N]) -> Self {
        Self::Map(
            pairs
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
        )
    }
}

/// A validated head resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Root-relative path of the file
    pub path: PathBuf,
    pub kind: ResourceKind,
    /// Public URL the tag points to
    pub url: String,
    /// Rendered attribute string (leading space included)
    pub attributes: String,
}

impl Resource {
    pub fn markup(&self) -> String {
        match self.kind {
            ResourceKind::Style => {
                format!("<link rel=\"stylesheet\" href=\"{}\"{}>", self.url, self.attributes)
            }
            ResourceKind::Script => {
                format!("<script src=\"{}\"{}></script>", self.url, self.attributes)
            }
        }
    }
}

/// Registers, validates, compresses and renders head resources.
#[derive(Debug, Clone)]
pub struct ResourcePipeline {
    root: PathBuf,
    base_url: String,
    style_base: PathBuf,
    script_base: PathBuf,
    modules: PathBuf,
    min_dir: String,
    styles: Vec<Resource>,
    scripts: Vec<Resource>,
}

impl ResourcePipeline {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            root: config.get_root().to_path_buf(),
            base_url: config.site.base_url.clone(),
            style_base: config.paths.styles.clone(),
            script_base: config.paths.scripts.clone(),
            modules: config.paths.modules.clone(),
            min_dir: config.paths.min_dir.clone(),
            styles: Vec::new(),
            scripts: Vec::new(),
        }
    }

    fn paths(&self) -> PathResolver<'_> {
        PathResolver::new(&self.root, &self.base_url)
    }

    fn base_for(&self, kind: ResourceKind) -> &Path {
        match kind {
            ResourceKind::Style => &self.style_base,
            ResourceKind::Script => &self.script_base,
        }
    }

    /// Add a stylesheet. Non-root paths are relative to `[paths].styles`.
    pub fn add_style(
        &mut self,
        path: impl AsRef<Path>,
        attributes: impl Into<Attributes>,
        from_root: bool,
        warnings: &mut Warnings,
    ) {
        self.add(ResourceKind::Style, path.as_ref(), attributes.into(), from_root, warnings);
    }

    /// Add a script. Non-root paths are relative to `[paths].scripts`.
    pub fn add_script(
        &mut self,
        path: impl AsRef<Path>,
        attributes: impl Into<Attributes>,
        from_root: bool,
        warnings: &mut Warnings,
    ) {
        self.add(ResourceKind::Script, path.as_ref(), attributes.into(), from_root, warnings);
    }

    fn add(
        &mut self,
        kind: ResourceKind,
        path: &Path,
        attributes: Attributes,
        from_root: bool,
        warnings: &mut Warnings,
    ) {
        if path.as_os_str().is_empty() {
            return;
        }

        let rel = if from_root {
            without_leading_slash(path).to_path_buf()
        } else {
            self.base_for(kind).join(without_leading_slash(path))
        };

        let Ok(meta) = fs::metadata(self.paths().root_path(&rel)) else {
            warnings.push(Warning::MissingResource { kind: kind.label(), path: rel });
            return;
        };
        if meta.len() == 0 {
            warnings.push(Warning::EmptyResource { kind: kind.label(), path: rel });
            return;
        }

        let resource = Resource {
            url: self.paths().public_url(&rel),
            path: rel,
            kind,
            attributes: attributes.render(),
        };
        match kind {
            ResourceKind::Style => self.styles.push(resource),
            ResourceKind::Script => self.scripts.push(resource),
        }
    }

    pub fn styles(&self) -> &[Resource] {
        &self.styles
    }

    pub fn scripts(&self) -> &[Resource] {
        &self.scripts
    }

    pub fn render_styles(&self) -> String {
        self.styles.iter().map(Resource::markup).collect()
    }

    pub fn render_scripts(&self) -> String {
        self.scripts.iter().map(Resource::markup).collect()
    }
}

/// `/app.css` and `app.css` name the same file under a base.
fn without_leading_slash(path: &Path) -> &Path {
    path.strip_prefix("/").unwrap_or(path)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::{TempDir, tempdir};

    /// A site root with the default asset layout.
    pub(crate) fn site() -> (TempDir, SiteConfig) {
        let dir = tempdir().unwrap();
        let mut config = SiteConfig::default();
        config.set_root(dir.path());
        fs::create_dir_all(dir.path().join("assets/css")).unwrap();
        fs::create_dir_all(dir.path().join("assets/js")).unwrap();
        (dir, config)
    }

    #[test]
    fn test_attributes_render() {
        assert_eq!(Attributes::None.render(), "");
        assert_eq!(Attributes::from("").render(), "");
        assert_eq!(Attributes::from("defer").render(), " defer");
        assert_eq!(
            Attributes::from([("media", "print"), ("id", "main")]).render(),
            " media=\"print\" id=\"main\""
        );
    }

    #[test]
    fn test_add_style_registers_in_order() {
        let (dir, config) = site();
        fs::write(dir.path().join("assets/css/a.css"), "a{}").unwrap();
        fs::write(dir.path().join("assets/css/b.css"), "b{}").unwrap();

        let mut pipeline = ResourcePipeline::new(&config);
        let mut warnings = Warnings::default();
        pipeline.add_style("b.css", "", false, &mut warnings);
        pipeline.add_style("a.css", [("media", "print")], false, &mut warnings);
        pipeline.add_style("b.css", "", false, &mut warnings);

        assert!(warnings.is_empty());
        let urls: Vec<_> = pipeline.styles().iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, ["/assets/css/b.css", "/assets/css/a.css", "/assets/css/b.css"]);
        assert_eq!(
            pipeline.render_styles(),
            "<link rel=\"stylesheet\" href=\"/assets/css/b.css\">\
             <link rel=\"stylesheet\" href=\"/assets/css/a.css\" media=\"print\">\
             <link rel=\"stylesheet\" href=\"/assets/css/b.css\">"
        );
    }

    #[test]
    fn test_add_script_from_root() {
        let (dir, config) = site();
        fs::create_dir_all(dir.path().join("vendor")).unwrap();
        fs::write(dir.path().join("vendor/lib.js"), "let a;").unwrap();

        let mut pipeline = ResourcePipeline::new(&config);
        let mut warnings = Warnings::default();
        pipeline.add_script("/vendor/lib.js", "defer", true, &mut warnings);

        assert_eq!(
            pipeline.render_scripts(),
            "<script src=\"/vendor/lib.js\" defer></script>"
        );
    }

    #[test]
    fn test_leading_slash_stays_under_base() {
        let (dir, config) = site();
        fs::write(dir.path().join("assets/css/app.css"), "a{}").unwrap();

        let mut pipeline = ResourcePipeline::new(&config);
        let mut warnings = Warnings::default();
        pipeline.add_style("/app.css", "", false, &mut warnings);

        assert!(warnings.is_empty());
        assert_eq!(pipeline.styles()[0].url, "/assets/css/app.css");
        assert_eq!(pipeline.styles()[0].path, PathBuf::from("assets/css/app.css"));
    }

    #[test]
    fn test_missing_resource_warns() {
        let (_dir, config) = site();
        let mut pipeline = ResourcePipeline::new(&config);
        let mut warnings = Warnings::default();

        pipeline.add_style("nope.css", "", false, &mut warnings);

        assert!(pipeline.styles().is_empty());
        assert_eq!(
            warnings.as_slice(),
            &[Warning::MissingResource {
                kind: "stylesheet",
                path: PathBuf::from("assets/css/nope.css"),
            }]
        );
    }

    #[test]
    fn test_empty_resource_skipped_with_warning() {
        let (dir, config) = site();
        fs::write(dir.path().join("assets/css/empty.css"), "").unwrap();

        let mut pipeline = ResourcePipeline::new(&config);
        let mut warnings = Warnings::default();
        pipeline.add_style("empty.css", "", false, &mut warnings);

        assert!(pipeline.styles().is_empty());
        assert!(matches!(
            warnings.as_slice(),
            [Warning::EmptyResource { kind: "stylesheet", .. }]
        ));
    }

    #[test]
    fn test_empty_path_ignored() {
        let (_dir, config) = site();
        let mut pipeline = ResourcePipeline::new(&config);
        let mut warnings = Warnings::default();

        pipeline.add_script("", "", false, &mut warnings);
        assert!(pipeline.scripts().is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_resource_kind_from_extension() {
        assert_eq!(ResourceKind::from_extension("CSS"), Some(ResourceKind::Style));
        assert_eq!(ResourceKind::from_extension("js"), Some(ResourceKind::Script));
        assert_eq!(ResourceKind::from_extension("png"), None);
    }
}
