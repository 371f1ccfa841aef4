//! vellum - request-scoped HTML document assembly.
//!
//! One `DocumentAssembler` is created per request. Callers configure page
//! metadata, register hooks and resources, then call `render`, which either
//! replays the cached page or builds the document around the page body.
//!
//! ```text
//! Request ──► DocumentAssembler ──► render ──┬── PageCache hit ──► out
//!                 │                           └── build ──► minify ──► PageCache ──► out
//!                 ├── HookRegistry
//!                 ├── ResourcePipeline
//!                 └── DocumentState
//! ```

pub mod assets;
pub mod cache;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod hooks;
pub mod logger;
pub mod request;
pub mod serve;
pub mod utils;

pub use assets::{Attributes, ResourceKind, ResourcePipeline};
pub use cache::{CacheError, PageCache, TransientStore};
pub use config::SiteConfig;
pub use document::{ContentSource, Diagnostics, DocumentAssembler, RenderOutcome};
pub use error::{RenderError, Warning, Warnings};
pub use hooks::{HookName, HookRegistry, HookSource};
pub use request::Request;
