//! Public and internal types for the nodupe API and pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Blake3 content digest of a whole file (32 bytes).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// Lowercase hex form (64 chars), as stored in the index file.
    pub fn to_hex(&self) -> String {
        blake3::Hash::from_bytes(self.0).to_hex().to_string()
    }

    /// Parse the 64-char hex form written by [`Digest::to_hex`].
    pub fn from_hex(s: &str) -> Option<Digest> {
        blake3::Hash::from_hex(s).ok().map(|h| Digest(*h.as_bytes()))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// Canonical location registered for a digest. Replaced wholesale, never edited in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
}

/// Outcome of [`FingerprintIndex::resolve`](crate::engine::FingerprintIndex::resolve).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// First time this digest was seen; candidate is now canonical.
    Registered,
    /// Registered path no longer exists as a regular file; candidate replaced it.
    ReplacedStale { old: PathBuf },
    /// Candidate already is the canonical path.
    Unchanged,
    /// Candidate has the same content as `canonical`. Index left untouched.
    DuplicateOf { canonical: PathBuf },
}

/// One completed elimination: `duplicate_path` was deleted in favour of `canonical_path`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DuplicateEntry {
    pub duplicate_path: PathBuf,
    pub canonical_path: PathBuf,
}

impl fmt::Display for DuplicateEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Duplicate deleted: {} which was a duplicate of {}",
            self.duplicate_path.display(),
            self.canonical_path.display()
        )
    }
}

/// What to scan. Immutable for the duration of one scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScanSettings {
    pub root_directory: PathBuf,
    pub recursive: bool,
}

/// Run options beyond [`ScanSettings`] (CLI and lib).
#[derive(Clone, Debug, Default)]
pub struct Opts {
    /// Persistent fingerprint index (JSON).
    pub index_path: PathBuf,
    /// Append-only duplicate log.
    pub log_path: PathBuf,
    /// Settings file; excluded from the walk when it lives inside the root.
    pub settings_path: Option<PathBuf>,
    /// Per-run diagnostic log; excluded from the walk like the other state files.
    pub run_log_path: Option<PathBuf>,
    /// Override worker thread count. When None, uses available parallelism.
    pub num_threads: Option<usize>,
    /// Exclude patterns (glob syntax, e.g. `node_modules`, `*.log`).
    pub exclude: Vec<String>,
    /// Debug logging and progress counter.
    pub verbose: bool,
    /// Report duplicates without deleting, logging or persisting the index.
    pub dry_run: bool,
}

/// Counters and eliminations for one scan.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Paths handed to workers by the walker.
    pub files_seen: usize,
    pub registered: usize,
    pub replaced_stale: usize,
    pub unchanged: usize,
    /// Duplicates deleted and logged (or, in dry-run, only detected).
    pub duplicates: Vec<DuplicateEntry>,
    /// Files that could not be fingerprinted (excluded from this run).
    pub read_failures: usize,
    /// Duplicates whose deletion failed; these are never logged.
    pub delete_failures: usize,
    /// Duplicates deleted but not recorded because the log append failed.
    pub log_failures: usize,
    /// Walk errors (unreadable directories etc.).
    pub walk_errors: usize,
}

impl ScanReport {
    /// Fold another worker's counters into this one.
    pub fn merge(&mut self, other: ScanReport) {
        self.files_seen += other.files_seen;
        self.registered += other.registered;
        self.replaced_stale += other.replaced_stale;
        self.unchanged += other.unchanged;
        self.duplicates.extend(other.duplicates);
        self.read_failures += other.read_failures;
        self.delete_failures += other.delete_failures;
        self.log_failures += other.log_failures;
        self.walk_errors += other.walk_errors;
    }
}
