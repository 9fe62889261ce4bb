//! Index tests: resolve decisions, concurrent resolves, JSON load/persist and corruption.

use nodupe::engine::{FingerprintIndex, IndexRecords, load_index, parse_index, persist_index};
use nodupe::{Decision, Digest, FileRecord, ScanError};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Barrier};
use std::thread;

fn digest_of(content: &[u8]) -> Digest {
    Digest(*blake3::hash(content).as_bytes())
}

fn always(_: &Path) -> bool {
    true
}

fn never(_: &Path) -> bool {
    false
}

// --- resolve ---

#[test]
fn test_resolve_registers_unknown_digest() {
    let index = FingerprintIndex::new();
    let d = digest_of(b"x");
    assert_eq!(
        index.resolve_with(d, Path::new("/data/a.txt"), always),
        Decision::Registered
    );
    assert_eq!(
        index.get(&d),
        Some(FileRecord {
            path: PathBuf::from("/data/a.txt")
        })
    );
}

#[test]
fn test_resolve_duplicate_leaves_index_untouched() {
    let index = FingerprintIndex::new();
    let d = digest_of(b"x");
    index.resolve_with(d, Path::new("/data/a.txt"), always);
    assert_eq!(
        index.resolve_with(d, Path::new("/data/b.txt"), always),
        Decision::DuplicateOf {
            canonical: PathBuf::from("/data/a.txt")
        }
    );
    assert_eq!(index.len(), 1);
    assert_eq!(index.get(&d).unwrap().path, PathBuf::from("/data/a.txt"));
}

#[test]
fn test_resolve_same_path_is_unchanged() {
    let index = FingerprintIndex::new();
    let d = digest_of(b"x");
    let p = Path::new("/data/a.txt");
    assert_eq!(index.resolve_with(d, p, always), Decision::Registered);
    assert_eq!(index.resolve_with(d, p, always), Decision::Unchanged);
    assert_eq!(index.resolve_with(d, p, always), Decision::Unchanged);
    assert_eq!(index.len(), 1);
}

#[test]
fn test_resolve_replaces_stale_entry() {
    let mut records = HashMap::new();
    let d = digest_of(b"x");
    records.insert(
        d,
        FileRecord {
            path: PathBuf::from("/data/old.txt"),
        },
    );
    let index = FingerprintIndex::from_records(records);
    assert_eq!(
        index.resolve_with(d, Path::new("/data/new.txt"), never),
        Decision::ReplacedStale {
            old: PathBuf::from("/data/old.txt")
        }
    );
    assert_eq!(index.get(&d).unwrap().path, PathBuf::from("/data/new.txt"));
}

#[test]
fn test_resolve_uses_real_filesystem_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let canonical = dir.path().join("a.txt");
    let candidate = dir.path().join("b.txt");
    std::fs::write(&canonical, b"x").unwrap();
    std::fs::write(&candidate, b"x").unwrap();

    let index = FingerprintIndex::new();
    let d = digest_of(b"x");
    assert_eq!(index.resolve(d, &canonical), Decision::Registered);
    assert_eq!(
        index.resolve(d, &candidate),
        Decision::DuplicateOf {
            canonical: canonical.clone()
        }
    );

    std::fs::remove_file(&canonical).unwrap();
    assert_eq!(
        index.resolve(d, &candidate),
        Decision::ReplacedStale {
            old: canonical.clone()
        }
    );
    assert_eq!(index.resolve(d, &candidate), Decision::Unchanged);
}

#[test]
fn test_resolve_directory_counts_as_stale() {
    let dir = tempfile::tempdir().unwrap();
    let mut records = HashMap::new();
    let d = digest_of(b"x");
    records.insert(
        d,
        FileRecord {
            path: dir.path().to_path_buf(),
        },
    );
    let index = FingerprintIndex::from_records(records);
    let candidate = dir.path().join("c.txt");
    assert!(matches!(
        index.resolve(d, &candidate),
        Decision::ReplacedStale { .. }
    ));
}

#[test]
fn test_concurrent_resolves_register_exactly_once() {
    const THREADS: usize = 16;
    let index = Arc::new(FingerprintIndex::new());
    let barrier = Arc::new(Barrier::new(THREADS));
    let d = digest_of(b"same content");

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let path = PathBuf::from(format!("/data/copy{i}.txt"));
                barrier.wait();
                (path.clone(), index.resolve_with(d, &path, always))
            })
        })
        .collect();
    let results: Vec<(PathBuf, Decision)> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let registered: Vec<&PathBuf> = results
        .iter()
        .filter(|(_, dec)| *dec == Decision::Registered)
        .map(|(p, _)| p)
        .collect();
    assert_eq!(registered.len(), 1);
    let winner = registered[0].clone();
    for (path, decision) in &results {
        if *path != winner {
            assert_eq!(
                *decision,
                Decision::DuplicateOf {
                    canonical: winner.clone()
                }
            );
        }
    }
    assert_eq!(index.get(&d).unwrap().path, winner);
}

#[test]
fn test_concurrent_stale_replacement_happens_once() {
    const THREADS: usize = 8;
    let d = digest_of(b"x");
    let mut records = HashMap::new();
    records.insert(
        d,
        FileRecord {
            path: PathBuf::from("/gone/old.txt"),
        },
    );
    let index = Arc::new(FingerprintIndex::from_records(records));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|i| {
            let index = Arc::clone(&index);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let path = PathBuf::from(format!("/live/new{i}.txt"));
                barrier.wait();
                // Only paths under /live exist
                index.resolve_with(d, &path, |p| p.starts_with("/live"))
            })
        })
        .collect();
    let decisions: Vec<Decision> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let replaced = decisions
        .iter()
        .filter(|d| matches!(d, Decision::ReplacedStale { .. }))
        .count();
    let duplicates = decisions
        .iter()
        .filter(|d| matches!(d, Decision::DuplicateOf { .. }))
        .count();
    assert_eq!(replaced, 1);
    assert_eq!(duplicates, THREADS - 1);
}

// --- index storage ---

#[test]
fn test_load_index_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let records = load_index(&dir.path().join("nodupe-index.json")).unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_persist_then_load_preserves_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state").join("nodupe-index.json");
    let mut records: IndexRecords = HashMap::new();
    records.insert(
        digest_of(b"x"),
        FileRecord {
            path: PathBuf::from("/data/a.txt"),
        },
    );
    records.insert(
        digest_of(b"y"),
        FileRecord {
            path: PathBuf::from("/data/c.txt"),
        },
    );
    persist_index(&path, &records).unwrap();
    assert_eq!(load_index(&path).unwrap(), records);
    assert!(!dir.path().join("state").join("nodupe-index.json.tmp").exists());
}

#[test]
fn test_persisted_index_is_sorted_hex_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nodupe-index.json");
    let mut records: IndexRecords = HashMap::new();
    for name in ["a", "b", "c", "d"] {
        records.insert(
            digest_of(name.as_bytes()),
            FileRecord {
                path: PathBuf::from(format!("/data/{name}")),
            },
        );
    }
    persist_index(&path, &records).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    let obj = value.as_object().unwrap();
    assert_eq!(obj.len(), 4);
    let d = digest_of(b"a");
    assert_eq!(obj[&d.to_hex()]["path"], "/data/a");

    let keys: Vec<&String> = obj.keys().collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_parse_index_invalid_json_is_corrupt() {
    let err = parse_index(b"{ not json", Path::new("idx.json")).unwrap_err();
    assert!(matches!(err, ScanError::IndexCorrupt { .. }));
}

#[test]
fn test_parse_index_empty_file_is_corrupt() {
    let err = parse_index(b"", Path::new("idx.json")).unwrap_err();
    assert!(matches!(err, ScanError::IndexCorrupt { .. }));
}

#[test]
fn test_parse_index_bad_digest_key_is_corrupt() {
    let err = parse_index(br#"{"xyz": {"path": "/a"}}"#, Path::new("idx.json")).unwrap_err();
    match err {
        ScanError::IndexCorrupt { reason, .. } => assert!(reason.contains("xyz")),
        other => panic!("expected IndexCorrupt, got {other:?}"),
    }
}

#[test]
fn test_parse_index_empty_object() {
    assert!(parse_index(b"{}", Path::new("idx.json")).unwrap().is_empty());
}
