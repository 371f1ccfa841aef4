//! Header, footer and component content.
//!
//! Header and footer precedence: inline markup, then the default file
//! rendered with a variable bag, then the default file rendered with the
//! caller's variables.

use crate::config::PathResolver;
use crate::error::{RenderError, Warning, Warnings};
use crate::utils::minify::{MinifyType, minify};
use crate::utils::template::{self, Variables};
use std::path::Path;

/// Where header or footer content comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContentSource {
    /// Literal markup.
    Inline(String),
    /// Render the default file with these variables.
    Variables(Variables),
    /// Render the default file with the caller's variables.
    #[default]
    Default,
}

impl From<&str> for ContentSource {
    fn from(markup: &str) -> Self {
        Self::from(markup.to_owned())
    }
}

impl From<String> for ContentSource {
    fn from(markup: String) -> Self {
        if markup.is_empty() {
            Self::Default
        } else {
            Self::Inline(markup)
        }
    }
}

impl From<Variables> for ContentSource {
    fn from(vars: Variables) -> Self {
        Self::Variables(vars)
    }
}

/// Resolve header or footer content.
///
/// `Ok(None)` means the default file is missing: a warning has been
/// recorded and the slot should keep its current content.
pub(super) fn load(
    slot: &'static str,
    source: ContentSource,
    vars: &Variables,
    default_file: Option<&Path>,
    paths: PathResolver<'_>,
    warnings: &mut Warnings,
) -> Result<Option<String>, RenderError> {
    let bag = match source {
        ContentSource::Inline(markup) => return Ok(Some(markup)),
        ContentSource::Variables(mut bag) => {
            for (key, value) in vars {
                bag.entry(key.clone()).or_insert_with(|| value.clone());
            }
            bag
        }
        ContentSource::Default => vars.clone(),
    };

    let Some(file) = default_file else {
        return Err(RenderError::MissingContentSource(slot));
    };

    let full = paths.root_path(file);
    if !full.is_file() {
        warnings.push(Warning::MissingContentFile {
            slot,
            path: file.to_path_buf(),
        });
        return Ok(None);
    }

    template::render_file(&full, &bag)
        .map(Some)
        .map_err(|err| RenderError::MissingSourceFile(full, err))
}

/// Render `<components>/<name>.html`, minified when `minify_output` is set.
pub(super) fn component(
    components: &Path,
    name: &str,
    vars: &Variables,
    paths: PathResolver<'_>,
    minify_output: bool,
) -> Result<String, RenderError> {
    let file = format!("{}.html", name.trim_end_matches(".html"));
    let full = paths.root_path(components.join(file));
    if !full.is_file() {
        return Err(RenderError::MissingComponent(name.to_owned(), full));
    }

    let rendered =
        template::render_file(&full, vars).map_err(|err| RenderError::MissingSourceFile(full, err))?;
    Ok(minify(MinifyType::Html(&rendered), minify_output).into_owned())
}
