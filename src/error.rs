//! Fatal render errors and non-fatal render warnings.
//!
//! Fatal conditions halt the request: whatever was already written to the
//! output stays there and nothing is rolled back. Warnings are logged and
//! collected, and document construction carries on.

use crate::cache::CacheError;
use crate::log;
use std::path::PathBuf;
use thiserror::Error;

/// Conditions that abort the current request.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("module `{}` not found in `{}`", .0, .1.display())]
    MissingModule(String, PathBuf),

    #[error("no file with extension `{extension}` found for module `{module}`")]
    MissingModuleAsset { module: String, extension: String },

    #[error("component `{}` not found in `{}`", .0, .1.display())]
    MissingComponent(String, PathBuf),

    #[error("`{}` does not exist or is not readable", .0.display())]
    MissingSourceFile(PathBuf, #[source] std::io::Error),

    #[error("could not set the {0}: no content and no default file configured")]
    MissingContentSource(&'static str),

    #[error("IO error when writing `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to emit the document")]
    Output(#[source] std::io::Error),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Non-fatal conditions reported while accumulating or building a page.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    #[error("could not find {kind} file => '{}'", path.display())]
    MissingResource { kind: &'static str, path: PathBuf },

    #[error("{kind} file is empty => '{}'", path.display())]
    EmptyResource { kind: &'static str, path: PathBuf },

    #[error("invalid html tag: {0}")]
    InvalidAttributeTarget(String),

    #[error("filter for `{0}` returned a value of the wrong kind")]
    FilterTypeMismatch(&'static str),

    #[error("invalid content source for the hook: {0}")]
    InvalidHookSource(String),

    #[error("{slot} file does not exist: {}", path.display())]
    MissingContentFile { slot: &'static str, path: PathBuf },

    #[error("invalid cdn type: {0}")]
    InvalidCdnType(String),
}

/// Per-request warning log.
///
/// Every pushed warning is also written to the terminal under `[warn]`.
#[derive(Debug, Default, Clone)]
pub struct Warnings(Vec<Warning>);

impl Warnings {
    pub fn push(&mut self, warning: Warning) {
        log!("warn"; "{warning}");
        self.0.push(warning);
    }

    pub fn as_slice(&self) -> &[Warning] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
