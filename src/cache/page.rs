//! Full-page HTML cache.
//!
//! One file per key, named by the hex encoding of the key so that every
//! distinct key maps to a distinct, filesystem-safe file name. Keys whose
//! hex name would exceed the file name limit are named by their blake3
//! digest instead, under a `b3-` prefix that no hex name can carry. Files
//! are written in place; see the module docs of [`crate::cache`] for the
//! concurrency caveats.

use super::CacheError;
use crate::log;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// File extension of every page cache entry.
pub const CACHE_EXTENSION: &str = "cache";

/// Longest file name most filesystems accept (`NAME_MAX`).
const MAX_FILE_NAME: usize = 255;

/// Content cache mapping a normalized request key to a rendered document.
#[derive(Debug, Clone)]
pub struct PageCache {
    dir: PathBuf,
}

impl PageCache {
    /// The directory is created lazily on the first `set`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Physical location of the entry for `key`.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        let name = format!("{}.{CACHE_EXTENSION}", hex::encode(key.as_bytes()));
        if name.len() <= MAX_FILE_NAME {
            return self.dir.join(name);
        }
        let digest = blake3::hash(key.as_bytes());
        self.dir.join(format!("b3-{}.{CACHE_EXTENSION}", digest.to_hex()))
    }

    /// Cached bytes for `key`, or `None` on a miss.
    ///
    /// An unreadable entry counts as a miss.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.entry_path(key)).ok()
    }

    /// Store `content` under `key`, creating the cache directory if needed.
    pub fn set(&self, key: &str, content: &[u8]) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).map_err(|err| CacheError::Io(self.dir.clone(), err))?;
        let path = self.entry_path(key);
        fs::write(&path, content).map_err(|err| CacheError::Io(path, err))
    }

    /// Delete the entry for `key`. Missing entries are ignored.
    pub fn purge(&self, key: &str) -> Result<(), CacheError> {
        let path = self.entry_path(key);
        match fs::remove_file(&path) {
            Ok(()) => {
                log!("cache"; "purged {key}");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(CacheError::Io(path, err)),
        }
    }

    /// Delete every `*.cache` file in the cache directory.
    ///
    /// Returns the number of entries removed.
    pub fn purge_all(&self) -> Result<usize, CacheError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(err) => return Err(CacheError::Io(self.dir.clone(), err)),
        };

        let mut removed = 0;
        for path in entries.flatten().map(|entry| entry.path()) {
            let is_entry = path.is_file()
                && path.extension().and_then(|e| e.to_str()) == Some(CACHE_EXTENSION);
            if !is_entry {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                // Another request got there first
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => return Err(CacheError::Io(path, err)),
            }
        }

        log!("cache"; "purged {removed} entries");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_round_trip_and_purge() {
        let dir = tempdir().unwrap();
        let cache = PageCache::new(dir.path().join("pages"));

        cache.set("/", b"<html>A</html>").unwrap();
        assert_eq!(cache.get("/").as_deref(), Some(&b"<html>A</html>"[..]));

        cache.purge("/").unwrap();
        assert!(cache.get("/").is_none());
    }

    #[test]
    fn test_get_miss_when_dir_absent() {
        let dir = tempdir().unwrap();
        let cache = PageCache::new(dir.path().join("never-created"));
        assert!(cache.get("/about").is_none());
    }

    #[test]
    fn test_set_creates_nested_dir() {
        let dir = tempdir().unwrap();
        let cache = PageCache::new(dir.path().join("a/b/c"));

        cache.set("/x", b"x").unwrap();
        assert!(dir.path().join("a/b/c").is_dir());
    }

    #[test]
    fn test_entry_path_is_hex_of_key() {
        let cache = PageCache::new("/tmp/pages");
        assert_eq!(
            cache.entry_path("/about"),
            PathBuf::from("/tmp/pages/2f61626f7574.cache")
        );
    }

    #[test]
    fn test_long_key_round_trip() {
        let dir = tempdir().unwrap();
        let cache = PageCache::new(dir.path().join("pages"));
        let key = format!("/blog/{}", "a".repeat(194));
        assert_eq!(key.len(), 200);

        let name = cache.entry_path(&key);
        let name = name.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("b3-"));
        assert!(name.len() <= MAX_FILE_NAME);

        cache.set(&key, b"<html>long</html>").unwrap();
        assert_eq!(cache.get(&key).as_deref(), Some(&b"<html>long</html>"[..]));
        assert_ne!(cache.entry_path(&key), cache.entry_path(&format!("{key}b")));

        assert_eq!(cache.purge_all().unwrap(), 1);
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn test_distinct_keys_distinct_files() {
        let cache = PageCache::new("/tmp/pages");
        assert_ne!(cache.entry_path("/a/b"), cache.entry_path("/a_b"));
        assert_ne!(cache.entry_path("/a"), cache.entry_path("/A"));
    }

    #[test]
    fn test_purge_missing_is_noop() {
        let dir = tempdir().unwrap();
        let cache = PageCache::new(dir.path());
        assert!(cache.purge("/nothing").is_ok());
    }

    #[test]
    fn test_purge_all_removes_every_entry() {
        let dir = tempdir().unwrap();
        let cache = PageCache::new(dir.path().join("pages"));

        for key in ["/", "/about", "/blog/post"] {
            cache.set(key, key.as_bytes()).unwrap();
        }
        // Unrelated files in the directory survive
        fs::write(dir.path().join("pages/keep.txt"), "keep").unwrap();

        assert_eq!(cache.purge_all().unwrap(), 3);
        for key in ["/", "/about", "/blog/post"] {
            assert!(cache.get(key).is_none());
        }
        assert!(dir.path().join("pages/keep.txt").exists());
    }

    #[test]
    fn test_purge_all_without_dir() {
        let dir = tempdir().unwrap();
        let cache = PageCache::new(dir.path().join("missing"));
        assert_eq!(cache.purge_all().unwrap(), 0);
    }

    #[test]
    fn test_set_overwrites() {
        let dir = tempdir().unwrap();
        let cache = PageCache::new(dir.path());

        cache.set("/k", b"first").unwrap();
        cache.set("/k", b"second").unwrap();
        assert_eq!(cache.get("/k").as_deref(), Some(&b"second"[..]));
    }

    #[test]
    fn test_set_failure_is_reported() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "not a dir").unwrap();

        // The cache directory path is occupied by a regular file
        let cache = PageCache::new(&blocker);
        assert!(cache.set("/", b"x").is_err());
    }
}
