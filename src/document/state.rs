//! Per-request document metadata and the attribute filter surface.

use crate::error::{Warning, Warnings};
use std::fmt;
use std::str::FromStr;

/// Ordered `key="value"` attributes of the `<html>` or `<body>` tag.
pub type TagAttributes = Vec<(String, String)>;

/// Render attributes as ` key="value"` pairs.
pub fn render_attributes(attributes: &[(String, String)]) -> String {
    attributes
        .iter()
        .map(|(key, value)| format!(" {key}=\"{value}\""))
        .collect()
}

/// A `<link>` or `<script>` tag pointing off-site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdnTag {
    pub kind: String,
    pub attributes: String,
}

impl CdnTag {
    pub fn markup(&self) -> String {
        let open = format!("<{} {}>", self.kind, self.attributes);
        if self.kind == "script" {
            format!("{open}</script>")
        } else {
            open
        }
    }
}

/// Everything the head and body tags are built from, except resources and hooks.
#[derive(Debug, Clone, Default)]
pub struct DocumentState {
    pub project_name: Option<String>,
    pub title: Option<String>,
    pub favicon: Option<String>,
    pub lang: String,
    pub charset: String,
    pub html_attributes: TagAttributes,
    pub body_attributes: TagAttributes,
    pub metas: Vec<String>,
    pub cdns: Vec<CdnTag>,
    /// `(variable, url)` of the inline ajax endpoint script.
    pub ajax: Option<(String, String)>,
    pub header: String,
    pub footer: String,
    pub minify: bool,
    pub cache_enabled: bool,
}

/// Targets accepted by [`DocumentState::apply_filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagTarget {
    Html,
    Body,
    Lang,
    Title,
    Charset,
}

impl TagTarget {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Body => "body",
            Self::Lang => "lang",
            Self::Title => "title",
            Self::Charset => "charset",
        }
    }
}

impl FromStr for TagTarget {
    type Err = Warning;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "body" => Ok(Self::Body),
            "lang" => Ok(Self::Lang),
            "title" => Ok(Self::Title),
            "charset" => Ok(Self::Charset),
            _ => Err(Warning::InvalidAttributeTarget(s.to_owned())),
        }
    }
}

impl fmt::Display for TagTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value passed through an attribute filter.
///
/// `html` and `body` carry attribute lists; `lang`, `title` and `charset` carry text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Attributes(TagAttributes),
}

impl DocumentState {
    /// Replace the value behind `target` with `transform(current)`.
    ///
    /// An unknown target is reported and leaves the state untouched, as does
    /// a transform that returns the wrong kind of value. Returns the stored
    /// value on success.
    pub fn apply_filter<F>(&mut self, target: &str, transform: F, warnings: &mut Warnings) -> Option<FilterValue>
    where
        F: FnOnce(FilterValue) -> FilterValue,
    {
        let target = match target.parse::<TagTarget>() {
            Ok(target) => target,
            Err(warning) => {
                warnings.push(warning);
                return None;
            }
        };

        match target {
            TagTarget::Html | TagTarget::Body => {
                let slot = match target {
                    TagTarget::Html => &mut self.html_attributes,
                    _ => &mut self.body_attributes,
                };
                match transform(FilterValue::Attributes(slot.clone())) {
                    FilterValue::Attributes(attributes) => {
                        *slot = attributes;
                        Some(FilterValue::Attributes(slot.clone()))
                    }
                    FilterValue::Text(_) => {
                        warnings.push(Warning::FilterTypeMismatch(target.as_str()));
                        None
                    }
                }
            }
            TagTarget::Title => {
                let current = self.title.clone().unwrap_or_default();
                match transform(FilterValue::Text(current)) {
                    FilterValue::Text(title) => {
                        self.title = Some(title.clone());
                        Some(FilterValue::Text(title))
                    }
                    FilterValue::Attributes(_) => {
                        warnings.push(Warning::FilterTypeMismatch(target.as_str()));
                        None
                    }
                }
            }
            TagTarget::Lang | TagTarget::Charset => {
                let slot = match target {
                    TagTarget::Lang => &mut self.lang,
                    _ => &mut self.charset,
                };
                match transform(FilterValue::Text(slot.clone())) {
                    FilterValue::Text(text) => {
                        *slot = text;
                        Some(FilterValue::Text(slot.clone()))
                    }
                    FilterValue::Attributes(_) => {
                        warnings.push(Warning::FilterTypeMismatch(target.as_str()));
                        None
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> DocumentState {
        DocumentState {
            lang: "en".into(),
            charset: "UTF-8".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_tag_target_case_insensitive() {
        assert_eq!("HTML".parse::<TagTarget>().unwrap(), TagTarget::Html);
        assert_eq!("Title".parse::<TagTarget>().unwrap(), TagTarget::Title);
        assert!("head".parse::<TagTarget>().is_err());
    }

    #[test]
    fn test_filter_title() {
        let mut state = state();
        state.title = Some("Home".into());
        let mut warnings = Warnings::default();

        let result = state.apply_filter(
            "title",
            |value| match value {
                FilterValue::Text(title) => FilterValue::Text(format!("{title} | Site")),
                other => other,
            },
            &mut warnings,
        );

        assert_eq!(result, Some(FilterValue::Text("Home | Site".into())));
        assert_eq!(state.title.as_deref(), Some("Home | Site"));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_filter_body_attributes() {
        let mut state = state();
        state.body_attributes.push(("class".into(), "dark".into()));
        let mut warnings = Warnings::default();

        state.apply_filter(
            "BODY",
            |value| match value {
                FilterValue::Attributes(mut attrs) => {
                    attrs.push(("data-page".into(), "home".into()));
                    FilterValue::Attributes(attrs)
                }
                other => other,
            },
            &mut warnings,
        );

        assert_eq!(
            render_attributes(&state.body_attributes),
            " class=\"dark\" data-page=\"home\""
        );
    }

    #[test]
    fn test_filter_lang_and_charset() {
        let mut state = state();
        let mut warnings = Warnings::default();

        state.apply_filter("lang", |_| FilterValue::Text("de".into()), &mut warnings);
        state.apply_filter("charset", |_| FilterValue::Text("ISO-8859-1".into()), &mut warnings);

        assert_eq!(state.lang, "de");
        assert_eq!(state.charset, "ISO-8859-1");
    }

    #[test]
    fn test_filter_invalid_target_no_mutation() {
        let mut state = state();
        let mut warnings = Warnings::default();
        let mut called = false;

        let result = state.apply_filter(
            "head",
            |value| {
                called = true;
                value
            },
            &mut warnings,
        );

        assert_eq!(result, None);
        assert!(!called);
        assert_eq!(state.lang, "en");
        assert_eq!(
            warnings.as_slice(),
            &[Warning::InvalidAttributeTarget("head".into())]
        );
    }

    #[test]
    fn test_filter_type_mismatch_keeps_value() {
        let mut state = state();
        let mut warnings = Warnings::default();

        let result = state.apply_filter("lang", |_| FilterValue::Attributes(Vec::new()), &mut warnings);

        assert_eq!(result, None);
        assert_eq!(state.lang, "en");
        assert_eq!(warnings.as_slice(), &[Warning::FilterTypeMismatch("lang")]);
    }

    #[test]
    fn test_cdn_markup() {
        let link = CdnTag {
            kind: "link".into(),
            attributes: "rel=\"preconnect\" href=\"https://x\"".into(),
        };
        let script = CdnTag {
            kind: "script".into(),
            attributes: "src=\"https://x/a.js\"".into(),
        };
        assert_eq!(link.markup(), "<link rel=\"preconnect\" href=\"https://x\">");
        assert_eq!(script.markup(), "<script src=\"https://x/a.js\"></script>");
    }
}
