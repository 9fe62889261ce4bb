//! What happens to a file after the index has decided about it.
//!
//! Only duplicates lead to filesystem action: the candidate is deleted first and logged second,
//! so the duplicate log can under-report (delete ok, append failed) but never records a deletion
//! that did not happen. Nothing here touches the index.

use log::{error, info, warn};
use std::path::Path;

use crate::engine::dup_log::DuplicateLog;
use crate::error::ScanError;
use crate::{Decision, DuplicateEntry, ScanReport};

/// Whether duplicates are actually removed.
#[derive(Clone, Copy, Debug)]
pub enum PolicyMode<'a> {
    Apply(&'a DuplicateLog),
    /// Report duplicates only: no deletion, no log entry.
    DryRun,
}

#[derive(Debug, PartialEq, Eq)]
pub enum PolicyOutcome {
    Registered,
    ReplacedStale,
    Unchanged,
    /// Deleted and logged.
    Eliminated(DuplicateEntry),
    /// Dry-run: would have been deleted.
    WouldEliminate(DuplicateEntry),
    /// Deletion failed; nothing logged.
    DeleteFailed,
    /// Deleted, but the log append failed.
    LogFailed(DuplicateEntry),
}

/// Act on `decision` for `candidate`. Must be called after `resolve` returned, without the index lock.
pub fn apply_decision(decision: Decision, candidate: &Path, mode: PolicyMode<'_>) -> PolicyOutcome {
    match decision {
        Decision::Registered => PolicyOutcome::Registered,
        Decision::Unchanged => PolicyOutcome::Unchanged,
        Decision::ReplacedStale { old } => {
            info!(
                "File {} does not exist, marking {} as original",
                old.display(),
                candidate.display()
            );
            PolicyOutcome::ReplacedStale
        }
        Decision::DuplicateOf { canonical } => {
            let entry = DuplicateEntry {
                duplicate_path: candidate.to_path_buf(),
                canonical_path: canonical,
            };
            eliminate(entry, mode)
        }
    }
}

fn eliminate(entry: DuplicateEntry, mode: PolicyMode<'_>) -> PolicyOutcome {
    info!(
        "Duplicate found: {} is a duplicate of {}",
        entry.duplicate_path.display(),
        entry.canonical_path.display()
    );
    let log = match mode {
        PolicyMode::DryRun => {
            info!("Dry run: would delete {}", entry.duplicate_path.display());
            return PolicyOutcome::WouldEliminate(entry);
        }
        PolicyMode::Apply(log) => log,
    };

    // A concurrent delete of the same path lands here as NotFound: reported, not fatal.
    if let Err(e) = std::fs::remove_file(&entry.duplicate_path) {
        let err = ScanError::file_io("delete", &entry.duplicate_path, e);
        warn!("{err}; not recording it as deleted");
        return PolicyOutcome::DeleteFailed;
    }

    match log.record(&entry) {
        Ok(()) => PolicyOutcome::Eliminated(entry),
        Err(e) => {
            error!("{e}; deletion of {} is unrecorded", entry.duplicate_path.display());
            PolicyOutcome::LogFailed(entry)
        }
    }
}

impl PolicyOutcome {
    /// Count this outcome into `report`.
    pub fn tally(self, report: &mut ScanReport) {
        match self {
            PolicyOutcome::Registered => report.registered += 1,
            PolicyOutcome::ReplacedStale => report.replaced_stale += 1,
            PolicyOutcome::Unchanged => report.unchanged += 1,
            PolicyOutcome::Eliminated(entry) | PolicyOutcome::WouldEliminate(entry) => {
                report.duplicates.push(entry)
            }
            PolicyOutcome::DeleteFailed => report.delete_failures += 1,
            PolicyOutcome::LogFailed(entry) => {
                report.log_failures += 1;
                report.duplicates.push(entry);
            }
        }
    }
}
