//! Named extension points in the document.
//!
//! Eight canonical hooks mark fixed positions around `<head>` and `<body>`;
//! any other name is a custom hook that callers render themselves through
//! `DocumentAssembler::hook_content`.
//!
//! Resolution order within a hook is priority descending, then registration
//! order for equal priorities.

use crate::config::PathResolver;
use crate::error::{Warning, Warnings};
use crate::utils::template::{self, Variables};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

pub const BEFORE_HEAD: &str = "before_head";
pub const TOP_HEAD: &str = "top_head";
pub const BOTTOM_HEAD: &str = "bottom_head";
pub const AFTER_HEAD: &str = "after_head";
pub const BEFORE_BODY: &str = "before_body";
pub const TOP_BODY: &str = "top_body";
pub const BOTTOM_BODY: &str = "bottom_body";
pub const AFTER_BODY: &str = "after_body";

/// A hook position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HookName {
    BeforeHead,
    TopHead,
    BottomHead,
    AfterHead,
    BeforeBody,
    TopBody,
    BottomBody,
    AfterBody,
    Custom(String),
}

impl HookName {
    /// The stable literal identifier of this hook.
    pub fn as_str(&self) -> &str {
        match self {
            Self::BeforeHead => BEFORE_HEAD,
            Self::TopHead => TOP_HEAD,
            Self::BottomHead => BOTTOM_HEAD,
            Self::AfterHead => AFTER_HEAD,
            Self::BeforeBody => BEFORE_BODY,
            Self::TopBody => TOP_BODY,
            Self::BottomBody => BOTTOM_BODY,
            Self::AfterBody => AFTER_BODY,
            Self::Custom(name) => name,
        }
    }

    pub const fn is_canonical(&self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl From<&str> for HookName {
    fn from(name: &str) -> Self {
        match name {
            BEFORE_HEAD => Self::BeforeHead,
            TOP_HEAD => Self::TopHead,
            BOTTOM_HEAD => Self::BottomHead,
            AFTER_HEAD => Self::AfterHead,
            BEFORE_BODY => Self::BeforeBody,
            TOP_BODY => Self::TopBody,
            BOTTOM_BODY => Self::BottomBody,
            AFTER_BODY => Self::AfterBody,
            custom => Self::Custom(custom.to_owned()),
        }
    }
}

impl From<String> for HookName {
    fn from(name: String) -> Self {
        Self::from(name.as_str())
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a hook registration gets its content from.
pub enum HookSource {
    /// A root-relative template path if such a file exists, literal markup otherwise.
    Text(String),
    /// A root-relative template path that must exist.
    File(PathBuf),
    /// Called at resolve time; `None` contributes nothing.
    Producer(Box<dyn Fn() -> Option<String>>),
}

impl HookSource {
    pub fn producer<F>(f: F) -> Self
    where
        F: Fn() -> Option<String> + 'static,
    {
        Self::Producer(Box::new(f))
    }
}

impl From<&str> for HookSource {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for HookSource {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl fmt::Debug for HookSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

#[derive(Debug)]
struct Registration {
    source: HookSource,
    priority: i32,
}

/// All hook registrations for one request.
#[derive(Debug, Default)]
pub struct HookRegistry {
    hooks: HashMap<HookName, Vec<Registration>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a registration. The source is not inspected until resolve time.
    pub fn register(&mut self, name: impl Into<HookName>, source: impl Into<HookSource>, priority: i32) {
        self.hooks.entry(name.into()).or_default().push(Registration {
            source: source.into(),
            priority,
        });
    }

    /// Number of registrations for `name`.
    pub fn count(&self, name: &HookName) -> usize {
        self.hooks.get(name).map_or(0, Vec::len)
    }

    /// Concatenate the content of every registration for `name`.
    ///
    /// Sources that cannot be rendered are reported and skipped; the other
    /// registrations still contribute.
    pub fn resolve(&self, name: &HookName, paths: PathResolver<'_>, warnings: &mut Warnings) -> String {
        let Some(registrations) = self.hooks.get(name) else {
            return String::new();
        };

        let mut ordered: Vec<&Registration> = registrations.iter().collect();
        ordered.sort_by_key(|r| Reverse(r.priority));

        let mut out = String::new();
        for registration in ordered {
            match &registration.source {
                HookSource::Producer(produce) => {
                    if let Some(content) = produce() {
                        out.push_str(&content);
                    }
                }
                HookSource::Text(text) => {
                    let candidate = paths.root_path(text);
                    let rendered = candidate
                        .is_file()
                        .then(|| template::render_file(&candidate, &Variables::new()).ok())
                        .flatten();
                    out.push_str(rendered.as_deref().unwrap_or(text));
                }
                HookSource::File(path) => {
                    let full = paths.root_path(path);
                    match template::render_file(&full, &Variables::new()) {
                        Ok(content) => out.push_str(&content),
                        Err(_) => warnings.push(Warning::InvalidHookSource(name.to_string())),
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::fs;
    use std::path::Path;
    use std::rc::Rc;
    use tempfile::tempdir;

    fn resolve(registry: &HookRegistry, name: &str, root: &Path) -> (String, Warnings) {
        let mut warnings = Warnings::default();
        let out = registry.resolve(&name.into(), PathResolver::new(root, "/"), &mut warnings);
        (out, warnings)
    }

    #[test]
    fn test_hook_name_round_trip() {
        for name in [
            BEFORE_HEAD, TOP_HEAD, BOTTOM_HEAD, AFTER_HEAD, BEFORE_BODY, TOP_BODY, BOTTOM_BODY,
            AFTER_BODY,
        ] {
            let hook = HookName::from(name);
            assert!(hook.is_canonical());
            assert_eq!(hook.as_str(), name);
        }
        assert_eq!(HookName::from("sidebar"), HookName::Custom("sidebar".into()));
        assert!(!HookName::from("sidebar").is_canonical());
    }

    #[test]
    fn test_priority_descending() {
        let mut registry = HookRegistry::new();
        registry.register(TOP_HEAD, "X", 1);
        registry.register(TOP_HEAD, "Y", 5);

        assert_eq!(resolve(&registry, TOP_HEAD, Path::new("/nonexistent")).0, "YX");
    }

    #[test]
    fn test_equal_priority_keeps_registration_order() {
        let mut registry = HookRegistry::new();
        registry.register(TOP_BODY, "A", 0);
        registry.register(TOP_BODY, "B", 0);

        assert_eq!(resolve(&registry, TOP_BODY, Path::new("/nonexistent")).0, "AB");
    }

    #[test]
    fn test_mixed_priorities_stable() {
        let mut registry = HookRegistry::new();
        registry.register("custom", "a", 0);
        registry.register("custom", "b", -1);
        registry.register("custom", "c", 2);
        registry.register("custom", "d", 0);

        assert_eq!(resolve(&registry, "custom", Path::new("/nonexistent")).0, "cadb");
    }

    #[test]
    fn test_empty_hook_resolves_empty() {
        let registry = HookRegistry::new();
        let (out, warnings) = resolve(&registry, AFTER_BODY, Path::new("/nonexistent"));
        assert!(out.is_empty());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_producer_output_and_discard() {
        let mut registry = HookRegistry::new();
        registry.register(AFTER_HEAD, HookSource::producer(|| Some("<i>p</i>".into())), 0);
        registry.register(AFTER_HEAD, HookSource::producer(|| None), 0);

        let (out, warnings) = resolve(&registry, AFTER_HEAD, Path::new("/nonexistent"));
        assert_eq!(out, "<i>p</i>");
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_producer_not_called_until_resolve() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);

        let mut registry = HookRegistry::new();
        registry.register(TOP_HEAD, HookSource::producer(move || {
            counter.set(counter.get() + 1);
            Some(String::new())
        }), 0);
        assert_eq!(calls.get(), 0);

        resolve(&registry, TOP_HEAD, Path::new("/nonexistent"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_text_source_renders_existing_file() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("partials")).unwrap();
        fs::write(dir.path().join("partials/banner.html"), "<div>banner</div>").unwrap();

        let mut registry = HookRegistry::new();
        registry.register(TOP_BODY, "partials/banner.html", 0);
        registry.register(TOP_BODY, "partials/missing.html", 0);

        let (out, _) = resolve(&registry, TOP_BODY, dir.path());
        assert_eq!(out, "<div>banner</div>partials/missing.html");
    }

    #[test]
    fn test_invalid_file_source_warns_and_others_render() {
        let dir = tempdir().unwrap();

        let mut registry = HookRegistry::new();
        registry.register(BOTTOM_HEAD, "first", 2);
        registry.register(BOTTOM_HEAD, HookSource::File("nope.html".into()), 1);
        registry.register(BOTTOM_HEAD, "last", 0);

        let (out, warnings) = resolve(&registry, BOTTOM_HEAD, dir.path());
        assert_eq!(out, "firstlast");
        assert_eq!(
            warnings.as_slice(),
            &[Warning::InvalidHookSource(BOTTOM_HEAD.into())]
        );
    }

    #[test]
    fn test_count() {
        let mut registry = HookRegistry::new();
        registry.register(TOP_HEAD, "a", 0);
        registry.register(TOP_HEAD, "b", 0);
        assert_eq!(registry.count(&HookName::TopHead), 2);
        assert_eq!(registry.count(&HookName::AfterBody), 0);
    }
}
