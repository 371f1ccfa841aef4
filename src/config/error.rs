//! Errors raised while loading or validating `vellum.toml`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file is not valid vellum.toml")]
    Toml(#[from] toml::de::Error),

    /// A setting holds a value the assembler cannot work with.
    #[error("[{section}] `{field}` {reason}")]
    InvalidField {
        section: &'static str,
        field: &'static str,
        reason: &'static str,
    },

    /// A `[[page.hooks]]` entry without exactly one of `content` and `file`.
    #[error("[[page.hooks]] `{name}` {reason}")]
    HookSource { name: String, reason: &'static str },
}

impl ConfigError {
    pub(super) const fn invalid(section: &'static str, field: &'static str, reason: &'static str) -> Self {
        Self::InvalidField { section, field, reason }
    }
}
