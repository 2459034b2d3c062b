//! Usage counters: total downloads and unique users.
//!
//! The store is a trait so the dispatch layer never cares where the record
//! lives: production uses a JSON file, tests use memory. The file-backed
//! implementation is plain read-modify-write with no locking — two
//! concurrent updates can race and one increment can be lost. That is an
//! accepted limitation at this bot's scale; do not rely on the counters
//! being exact under load.

use crate::core::error::AppResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Persisted counter record.
///
/// `total_users` is not stored: it is always the size of `seen_user_ids`,
/// so the invariant holds by construction.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct StatsRecord {
    total_downloads: u64,
    seen_user_ids: BTreeSet<u64>,
}

/// Counter store contract used by the dispatch layer.
pub trait CounterStore: Send + Sync {
    /// Increments the download total by one.
    fn record_download(&self) -> AppResult<()>;

    /// Marks a user as seen. Idempotent per user id.
    fn record_user(&self, user_id: u64) -> AppResult<()>;

    /// Returns `(total_downloads, total_users)`.
    fn read_stats(&self) -> AppResult<(u64, u64)>;
}

/// File-backed counter store (one JSON record, no schema versioning).
pub struct FileCounterStore {
    path: PathBuf,
}

impl FileCounterStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Missing file reads as an empty record; the first write creates it.
    fn load(&self) -> AppResult<StatsRecord> {
        match fs_err::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(StatsRecord::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, record: &StatsRecord) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs_err::create_dir_all(parent)?;
        }
        fs_err::write(&self.path, serde_json::to_vec_pretty(record)?)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CounterStore for FileCounterStore {
    fn record_download(&self) -> AppResult<()> {
        let mut record = self.load()?;
        record.total_downloads += 1;
        self.save(&record)
    }

    fn record_user(&self, user_id: u64) -> AppResult<()> {
        let mut record = self.load()?;
        if record.seen_user_ids.insert(user_id) {
            self.save(&record)?;
        }
        Ok(())
    }

    fn read_stats(&self) -> AppResult<(u64, u64)> {
        let record = self.load()?;
        Ok((record.total_downloads, record.seen_user_ids.len() as u64))
    }
}

/// In-memory counter store for tests.
#[derive(Default)]
pub struct MemoryCounterStore {
    record: Mutex<StatsRecord>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for MemoryCounterStore {
    fn record_download(&self) -> AppResult<()> {
        let mut record = self.record.lock().unwrap_or_else(|e| e.into_inner());
        record.total_downloads += 1;
        Ok(())
    }

    fn record_user(&self, user_id: u64) -> AppResult<()> {
        let mut record = self.record.lock().unwrap_or_else(|e| e.into_inner());
        record.seen_user_ids.insert(user_id);
        Ok(())
    }

    fn read_stats(&self) -> AppResult<(u64, u64)> {
        let record = self.record.lock().unwrap_or_else(|e| e.into_inner());
        Ok((record.total_downloads, record.seen_user_ids.len() as u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_starts_empty() {
        let store = MemoryCounterStore::new();
        assert_eq!(store.read_stats().unwrap(), (0, 0));
    }

    #[test]
    fn test_record_user_is_idempotent() {
        let store = MemoryCounterStore::new();
        store.record_user(42).unwrap();
        store.record_user(42).unwrap();
        assert_eq!(store.read_stats().unwrap(), (0, 1));

        store.record_user(7).unwrap();
        assert_eq!(store.read_stats().unwrap(), (0, 2));
    }

    #[test]
    fn test_sequential_downloads_count_exactly() {
        let store = MemoryCounterStore::new();
        for _ in 0..5 {
            store.record_download().unwrap();
        }
        assert_eq!(store.read_stats().unwrap(), (5, 0));
    }

    #[test]
    fn test_path_echoes_the_constructor_argument() {
        let store = FileCounterStore::new("some/stats.json");
        assert_eq!(store.path(), Path::new("some/stats.json"));
    }

    #[test]
    fn test_file_store_missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCounterStore::new(dir.path().join("stats.json"));
        assert_eq!(store.read_stats().unwrap(), (0, 0));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");

        let store = FileCounterStore::new(&path);
        store.record_download().unwrap();
        store.record_download().unwrap();
        store.record_user(1).unwrap();
        store.record_user(1).unwrap();
        store.record_user(2).unwrap();

        // A fresh store over the same file sees the persisted state
        let reopened = FileCounterStore::new(&path);
        assert_eq!(reopened.read_stats().unwrap(), (2, 2));
    }
}
