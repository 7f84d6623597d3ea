//! Filesystem store for cache entries.
//!
//! Each key maps to `<dir>/<key>.entry`. Writes go to a uniquely named
//! temporary file in the same directory which is then renamed over the
//! record, so readers see either the old record or the new one in full.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::entry::CacheEntry;
use super::hash::is_valid_key;

const RECORD_EXTENSION: &str = "entry";

/// Cache I/O failure.
///
/// Never surfaced past the fetcher: reads degrade to a miss, writes and
/// deletes are best-effort.
#[derive(Debug, thiserror::Error)]
pub enum CacheIoError {
    #[error("CACHE_ERROR: {0}")]
    Io(#[from] io::Error),

    #[error("CACHE_ERROR: corrupt record: {0}")]
    Corrupt(String),

    #[error("CACHE_ERROR: invalid key format")]
    InvalidKey,
}

/// File-backed key to entry map.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, key: &str) -> Result<PathBuf, CacheIoError> {
        if !is_valid_key(key) {
            return Err(CacheIoError::InvalidKey);
        }
        Ok(self.dir.join(format!("{key}.{RECORD_EXTENSION}")))
    }

    /// Read an entry, reporting why it could not be read.
    pub fn load(&self, key: &str) -> Result<Option<CacheEntry>, CacheIoError> {
        let path = self.record_path(key)?;
        let record = match fs::read(&path) {
            Ok(record) => record,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let entry = CacheEntry::from_record(&record)?;
        if entry.key != key {
            return Err(CacheIoError::Corrupt(format!("record holds key {}", entry.key)));
        }

        Ok(Some(entry))
    }

    /// Read an entry. Any failure reads as a miss.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        match self.load(key) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(key, error = %e, "unreadable cache record, treating as miss");
                None
            }
        }
    }

    /// Write an entry, replacing any existing record for its key.
    pub fn put(&self, entry: &CacheEntry) -> Result<(), CacheIoError> {
        let path = self.record_path(&entry.key)?;
        let record = entry.to_record()?;

        fs::create_dir_all(&self.dir)?;

        let mut tmp = tempfile::Builder::new().prefix(".").suffix(".tmp").tempfile_in(&self.dir)?;
        tmp.write_all(&record)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| CacheIoError::Io(e.error))?;

        Ok(())
    }

    /// Remove an entry. Returns whether a record was present.
    pub fn delete(&self, key: &str) -> Result<bool, CacheIoError> {
        let path = self.record_path(key)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Keys of all records in the store, sorted.
    pub fn keys(&self) -> Result<Vec<String>, CacheIoError> {
        let dir = match fs::read_dir(&self.dir) {
            Ok(dir) => dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut keys = Vec::new();
        for item in dir {
            let path = item?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str())
                && is_valid_key(stem)
            {
                keys.push(stem.to_string());
            }
        }

        keys.sort();
        Ok(keys)
    }

    /// Remove every record. Returns the number removed.
    pub fn clear(&self) -> Result<usize, CacheIoError> {
        let mut removed = 0;
        for key in self.keys()? {
            if self.delete(&key)? {
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::hash::compute_cache_key;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn create_test_store() -> (CacheStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = CacheStore::new(temp_dir.path().join("responses"));
        (store, temp_dir)
    }

    fn make_entry(url: &str, body: &[u8]) -> CacheEntry {
        let stored_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        CacheEntry::new(compute_cache_key(url), body.to_vec(), Some("\"v1\"".into()), stored_at)
    }

    #[test]
    fn test_put_then_get_round_trip() {
        let (store, _temp_dir) = create_test_store();
        let entry = make_entry("https://example.com/api/models", b"{\"success\":true}\n");

        store.put(&entry).unwrap();

        let read = store.get(&entry.key).expect("entry should be present");
        assert_eq!(read, entry);
        assert_eq!(read.body, b"{\"success\":true}\n");
    }

    #[test]
    fn test_get_missing_key() {
        let (store, _temp_dir) = create_test_store();
        let key = compute_cache_key("https://example.com/nothing");
        assert!(store.get(&key).is_none());
        assert!(matches!(store.load(&key), Ok(None)));
    }

    #[test]
    fn test_put_creates_directory() {
        let (store, _temp_dir) = create_test_store();
        assert!(!store.dir().exists());

        store.put(&make_entry("https://example.com/a", b"a")).unwrap();
        assert!(store.dir().exists());
    }

    #[test]
    fn test_overwrite_replaces_record() {
        let (store, _temp_dir) = create_test_store();
        let first = make_entry("https://example.com/a", b"first");
        let second = CacheEntry { body: b"second".to_vec(), validator: None, ..first.clone() };

        store.put(&first).unwrap();
        store.put(&second).unwrap();

        let read = store.get(&first.key).unwrap();
        assert_eq!(read.body, b"second");
        assert_eq!(read.validator, None);
    }

    #[test]
    fn test_put_leaves_no_temp_files() {
        let (store, _temp_dir) = create_test_store();
        store.put(&make_entry("https://example.com/a", b"a")).unwrap();
        store.put(&make_entry("https://example.com/a", b"b")).unwrap();

        let names: Vec<_> = fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with(".entry"));
    }

    #[test]
    fn test_concurrent_puts_never_expose_partial_record() {
        let (store, _temp_dir) = create_test_store();
        let small = make_entry("https://example.com/a", &vec![b'a'; 200 * 1024]);
        let large = CacheEntry { body: vec![b'b'; 300 * 1024], ..small.clone() };
        store.put(&small).unwrap();

        std::thread::scope(|scope| {
            for writer in 0..4 {
                let (store, small, large) = (&store, &small, &large);
                scope.spawn(move || {
                    for i in 0..25 {
                        let entry = if (writer + i) % 2 == 0 { small } else { large };
                        store.put(entry).unwrap();
                    }
                });
            }
            for _ in 0..2 {
                let (store, small, large) = (&store, &small, &large);
                scope.spawn(move || {
                    for _ in 0..200 {
                        let read = store.get(&small.key).expect("record must stay readable");
                        assert!(read == *small || read == *large, "read a torn record of {} bytes", read.body.len());
                    }
                });
            }
        });

        let names: Vec<_> = fs::read_dir(store.dir()).unwrap().collect();
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_corrupt_record_reads_as_miss() {
        let (store, _temp_dir) = create_test_store();
        let entry = make_entry("https://example.com/a", b"a");
        store.put(&entry).unwrap();

        fs::write(store.dir().join(format!("{}.entry", entry.key)), b"garbage").unwrap();

        assert!(matches!(store.load(&entry.key), Err(CacheIoError::Corrupt(_))));
        assert!(store.get(&entry.key).is_none());
    }

    #[test]
    fn test_record_under_wrong_key_reads_as_miss() {
        let (store, _temp_dir) = create_test_store();
        let entry = make_entry("https://example.com/a", b"a");
        let other = compute_cache_key("https://example.com/b");
        store.put(&entry).unwrap();

        fs::copy(store.dir().join(format!("{}.entry", entry.key)), store.dir().join(format!("{other}.entry"))).unwrap();

        assert!(store.get(&other).is_none());
    }

    #[test]
    fn test_invalid_key_rejected() {
        let (store, _temp_dir) = create_test_store();
        assert!(matches!(store.load("../escape"), Err(CacheIoError::InvalidKey)));
        assert!(store.get("../escape").is_none());
    }

    #[test]
    fn test_delete() {
        let (store, _temp_dir) = create_test_store();
        let entry = make_entry("https://example.com/a", b"a");
        store.put(&entry).unwrap();

        assert!(store.delete(&entry.key).unwrap());
        assert!(store.get(&entry.key).is_none());
        assert!(!store.delete(&entry.key).unwrap());
    }

    #[test]
    fn test_keys_and_clear() {
        let (store, _temp_dir) = create_test_store();
        assert!(store.keys().unwrap().is_empty());

        let a = make_entry("https://example.com/a", b"a");
        let b = make_entry("https://example.com/b", b"b");
        store.put(&a).unwrap();
        store.put(&b).unwrap();
        fs::write(store.dir().join("notes.txt"), b"ignored").unwrap();

        let mut expected = vec![a.key.clone(), b.key.clone()];
        expected.sort();
        assert_eq!(store.keys().unwrap(), expected);

        assert_eq!(store.clear().unwrap(), 2);
        assert!(store.keys().unwrap().is_empty());
        assert!(store.dir().join("notes.txt").exists());
    }
}
