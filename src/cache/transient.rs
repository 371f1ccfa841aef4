//! Named values with a time-to-live, persisted as one JSON map.
//!
//! ```json
//! { "api_data": { "value": {...}, "expires_at": 1767225600 } }
//! ```
//!
//! Every mutation reads the whole file, edits the map and rewrites the
//! whole file. Expiry is lazy: an expired record is dropped (and the file
//! rewritten) only when a `get` touches it.

use super::CacheError;
use crate::log;
use chrono::Utc;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

pub const MINUTE_IN_SECONDS: u64 = 60;
pub const HOUR_IN_SECONDS: u64 = 60 * MINUTE_IN_SECONDS;
pub const DAY_IN_SECONDS: u64 = 24 * HOUR_IN_SECONDS;
pub const WEEK_IN_SECONDS: u64 = 7 * DAY_IN_SECONDS;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TransientRecord {
    value: serde_json::Value,
    /// Unix timestamp (seconds) at which the record stops being served.
    expires_at: i64,
}

type TransientMap = BTreeMap<String, TransientRecord>;

/// Generic key/value cache with per-entry expiration.
#[derive(Debug, Clone)]
pub struct TransientStore {
    path: PathBuf,
}

impl TransientStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value stored under `name`, or `None` if absent or expired.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, CacheError> {
        self.get_at(name, Utc::now().timestamp())
    }

    /// Store `value` under `name` for `ttl_secs` seconds.
    pub fn set<T: Serialize>(&self, name: &str, value: &T, ttl_secs: u64) -> Result<(), CacheError> {
        self.set_at(name, value, ttl_secs, Utc::now().timestamp())
    }

    /// Remove `name`. Returns whether it was present.
    pub fn delete(&self, name: &str) -> Result<bool, CacheError> {
        let mut map = self.load()?;
        if map.remove(name).is_none() {
            return Ok(false);
        }
        self.save(&map)?;
        Ok(true)
    }

    /// Names currently in the file, expired or not.
    pub fn names(&self) -> Result<Vec<String>, CacheError> {
        Ok(self.load()?.into_keys().collect())
    }

    fn get_at<T: DeserializeOwned>(&self, name: &str, now: i64) -> Result<Option<T>, CacheError> {
        let mut map = self.load()?;
        let Some(record) = map.get(name) else {
            return Ok(None);
        };

        if now >= record.expires_at {
            map.remove(name);
            self.save(&map)?;
            log!("transient"; "expired {name}");
            return Ok(None);
        }

        serde_json::from_value(record.value.clone())
            .map(Some)
            .map_err(|err| CacheError::Json(self.path.clone(), err))
    }

    fn set_at<T: Serialize>(
        &self,
        name: &str,
        value: &T,
        ttl_secs: u64,
        now: i64,
    ) -> Result<(), CacheError> {
        let value =
            serde_json::to_value(value).map_err(|err| CacheError::Json(self.path.clone(), err))?;
        let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);

        let mut map = self.load()?;
        map.insert(
            name.to_owned(),
            TransientRecord {
                value,
                expires_at: now.saturating_add(ttl),
            },
        );
        self.save(&map)
    }

    /// Read the whole map. A missing file is an empty map.
    fn load(&self) -> Result<TransientMap, CacheError> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(TransientMap::new()),
            Err(err) => return Err(CacheError::Io(self.path.clone(), err)),
        };
        if content.is_empty() {
            return Ok(TransientMap::new());
        }
        serde_json::from_slice(&content).map_err(|err| CacheError::Json(self.path.clone(), err))
    }

    /// Overwrite the whole file with `map`.
    fn save(&self, map: &TransientMap) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| CacheError::Io(parent.to_path_buf(), err))?;
        }
        let content =
            serde_json::to_vec(map).map_err(|err| CacheError::Json(self.path.clone(), err))?;
        fs::write(&self.path, content).map_err(|err| CacheError::Io(self.path.clone(), err))
    }
}
