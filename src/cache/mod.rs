//! Filesystem-resident caches shared across requests.
//!
//! | Cache            | Layout                                   | Granularity          |
//! |------------------|------------------------------------------|----------------------|
//! | `PageCache`      | `<dir>/<hex(key)>.cache`, raw bytes      | one file per page    |
//! | `TransientStore` | single JSON map `name -> {value, expires}` | whole-file rewrite |
//!
//! # Concurrency
//!
//! Neither cache takes locks, renames atomically, or versions entries.
//! Concurrent writers to the same page key race and the last write wins;
//! concurrent transient writers each read-modify-write the whole map, so
//! updates can be lost. Both are fine for single-writer, low-contention use.

mod page;
mod transient;

pub use page::{CACHE_EXTENSION, PageCache};
pub use transient::{
    DAY_IN_SECONDS, HOUR_IN_SECONDS, MINUTE_IN_SECONDS, TransientStore, WEEK_IN_SECONDS,
};

use std::path::PathBuf;
use thiserror::Error;

/// Cache I/O errors.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("IO error on cache file `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("corrupt transient store `{}`", .0.display())]
    Json(PathBuf, #[source] serde_json::Error),
}
