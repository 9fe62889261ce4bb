//! Shared digest → canonical path map.
//!
//! Workers hold an `Arc<FingerprintIndex>` and go through [`FingerprintIndex::resolve`], the only
//! mutation entry point. Every lookup-and-update on the map happens inside one locked section, so
//! two workers racing on the same digest can never both register it, and nobody observes a
//! half-replaced record.
//!
//! The canonical path's existence check is a `stat` and runs with the lock released. The decision
//! is then taken under the lock only if the entry still names the path that was probed; if another
//! worker replaced it in the meantime, resolve starts over against the new entry.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::debug;

use crate::engine::tools::is_regular_file;
use crate::{Decision, Digest, FileRecord};

pub type IndexRecords = HashMap<Digest, FileRecord>;

#[derive(Debug, Default)]
pub struct FingerprintIndex {
    records: Mutex<IndexRecords>,
}

impl FingerprintIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: IndexRecords) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    /// Look up `digest` and register, replace or report `candidate` in one atomic step.
    /// `candidate` must be the absolute, resolved path of the file just fingerprinted.
    pub fn resolve(&self, digest: Digest, candidate: &Path) -> Decision {
        self.resolve_with(digest, candidate, is_regular_file)
    }

    /// [`resolve`](Self::resolve) with a caller-supplied "is this still a regular file" probe.
    pub fn resolve_with<F>(&self, digest: Digest, candidate: &Path, exists: F) -> Decision
    where
        F: Fn(&Path) -> bool,
    {
        loop {
            let canonical = {
                let mut records = self.lock();
                match records.get(&digest) {
                    Some(record) => record.path.clone(),
                    None => {
                        records.insert(
                            digest,
                            FileRecord {
                                path: candidate.to_path_buf(),
                            },
                        );
                        return Decision::Registered;
                    }
                }
            };

            let alive = exists(&canonical);

            let mut records = self.lock();
            let Some(record) = records.get_mut(&digest) else {
                continue;
            };
            if record.path != canonical {
                debug!("index entry {} changed while probing, retrying", digest);
                continue;
            }
            if !alive {
                *record = FileRecord {
                    path: candidate.to_path_buf(),
                };
                return Decision::ReplacedStale { old: canonical };
            }
            if canonical == candidate {
                return Decision::Unchanged;
            }
            return Decision::DuplicateOf { canonical };
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Canonical record for `digest`, if any (copy; the index may change right after).
    pub fn get(&self, digest: &Digest) -> Option<FileRecord> {
        self.lock().get(digest).cloned()
    }

    /// Copy of the whole map, e.g. for persisting while the index is still shared.
    pub fn snapshot(&self) -> IndexRecords {
        self.lock().clone()
    }

    pub fn into_records(self) -> IndexRecords {
        self.records
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // Every critical section leaves the map consistent, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, IndexRecords> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
