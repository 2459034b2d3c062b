//! File-backed counter store behavior across process-like reopens.

use mediadown::storage::{CounterStore, FileCounterStore};
use pretty_assertions::assert_eq;

#[test]
fn fresh_store_reports_zero() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileCounterStore::new(dir.path().join("stats.json"));
    assert_eq!(store.read_stats().unwrap(), (0, 0));
}

#[test]
fn counters_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.json");

    {
        let store = FileCounterStore::new(&path);
        store.record_user(100).unwrap();
        store.record_user(200).unwrap();
        store.record_download().unwrap();
        store.record_download().unwrap();
        store.record_download().unwrap();
    }

    let store = FileCounterStore::new(&path);
    assert_eq!(store.read_stats().unwrap(), (3, 2));
}

#[test]
fn repeat_users_never_inflate_the_user_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stats.json");

    let store = FileCounterStore::new(&path);
    for _ in 0..10 {
        store.record_user(7).unwrap();
    }
    assert_eq!(store.read_stats().unwrap(), (0, 1));

    // Same user marked again through a fresh handle stays one user
    let reopened = FileCounterStore::new(&path);
    reopened.record_user(7).unwrap();
    assert_eq!(reopened.read_stats().unwrap(), (0, 1));
}

#[test]
fn store_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deep").join("stats.json");

    let store = FileCounterStore::new(&path);
    store.record_download().unwrap();

    assert!(path.exists());
    assert_eq!(store.read_stats().unwrap(), (1, 0));
}

#[test]
fn downloads_and_users_count_independently() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileCounterStore::new(dir.path().join("stats.json"));

    store.record_download().unwrap();
    assert_eq!(store.read_stats().unwrap(), (1, 0));

    store.record_user(1).unwrap();
    assert_eq!(store.read_stats().unwrap(), (1, 1));
}
