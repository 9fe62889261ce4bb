//! One deduplication pass over a directory.
//!
//! `Idle → Loading → Scanning → Persisting → Done`, or `Scanning → Aborted` on Ctrl+C
//! or when a pipeline thread panicked.
//! The index is written once, after the pool has fully drained, and never after a cancelled scan.

use log::{debug, info, warn};
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::engine::dup_log::DuplicateLog;
use crate::engine::fingerprint_index::FingerprintIndex;
use crate::engine::index_store::{load_index, persist_index};
use crate::engine::progress::ScanProgress;
use crate::engine::tools::{canonicalize_state_path, check_root_and_canonicalize};
use crate::error::ScanError;
use crate::pipeline::{PipelineSpec, WorkerContext, drain_pipeline, run_pipeline};
use crate::utils::config::{ProgressConsts, WorkerThreadLimits};
use crate::utils::temp_path_for;
use crate::{Opts, ScanReport, ScanSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    Loading,
    Scanning,
    Persisting,
    Done,
    Aborted,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

struct PhaseTracker(ScanPhase);

impl PhaseTracker {
    fn advance(&mut self, next: ScanPhase) {
        debug!("scan phase: {} -> {}", self.0, next);
        self.0 = next;
    }
}

static CANCEL_FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();

/// Install the process-wide Ctrl+C handler (once) and return its flag, cleared.
pub fn install_cancel_handler() -> Result<Arc<AtomicBool>, ctrlc::Error> {
    if let Some(flag) = CANCEL_FLAG.get() {
        flag.store(false, Ordering::SeqCst);
        return Ok(Arc::clone(flag));
    }
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);
    ctrlc::set_handler(move || {
        handler_flag.store(true, Ordering::SeqCst);
        eprintln!("\nInterrupted. Finishing files in flight...");
    })?;
    Ok(Arc::clone(CANCEL_FLAG.get_or_init(|| flag)))
}

/// Paths the walker must never treat as candidates: our index, its temp file, the duplicate log,
/// the settings file and the run log.
fn state_files(opts: &Opts) -> Vec<PathBuf> {
    let mut paths = vec![
        opts.index_path.clone(),
        temp_path_for(&opts.index_path),
        opts.log_path.clone(),
    ];
    paths.extend(opts.settings_path.iter().cloned());
    paths.extend(opts.run_log_path.iter().cloned());
    paths
        .iter()
        .filter_map(|p| canonicalize_state_path(p))
        .collect()
}

/// Run one scan. `cancel` is polled by the walker and the workers; when it is set the scan
/// drains in-flight files and returns [`ScanError::Cancelled`] without writing the index.
pub fn run_scan(
    settings: &ScanSettings,
    opts: &Opts,
    cancel: Arc<AtomicBool>,
) -> Result<ScanReport, ScanError> {
    let mut phase = PhaseTracker(ScanPhase::Idle);
    let root = check_root_and_canonicalize(&settings.root_directory)?;
    info!("Directory to scan: {}", root.display());

    phase.advance(ScanPhase::Loading);
    let index = Arc::new(FingerprintIndex::from_records(load_index(
        &opts.index_path,
    )?));
    let log = if opts.dry_run {
        warn!("RUNNING IN DRY-RUN MODE. NO FILES WILL BE DELETED AND THE INDEX WILL NOT BE WRITTEN.");
        None
    } else {
        Some(Arc::new(DuplicateLog::open(&opts.log_path)?))
    };

    phase.advance(ScanPhase::Scanning);
    if settings.recursive {
        info!("Scanning directory recursively...");
    } else {
        info!("Scanning directory non-recursively...");
    }
    let progress = Arc::new(ScanProgress::new(
        opts.verbose,
        ProgressConsts::PROGRESS_UPDATE_BATCH_SIZE,
    ));
    let workers = WorkerContext {
        index: Arc::clone(&index),
        log,
        progress: Arc::clone(&progress),
        cancel: Arc::clone(&cancel),
    };
    let handles = run_pipeline(
        PipelineSpec {
            root,
            recursive: settings.recursive,
            state_files: state_files(opts),
            exclude: opts.exclude.clone(),
            num_threads: WorkerThreadLimits::current().workers(opts.num_threads),
        },
        &workers,
        Arc::clone(&cancel),
    );
    drop(workers);
    let drained = drain_pipeline(handles, opts.verbose);
    progress.finish();
    let report = match drained {
        Ok(report) => report,
        Err(e) => {
            phase.advance(ScanPhase::Aborted);
            return Err(e);
        }
    };

    if cancel.load(Ordering::SeqCst) {
        phase.advance(ScanPhase::Aborted);
        warn!(
            "Emergency stop triggered after {} files; index not written",
            report.files_seen
        );
        return Err(ScanError::Cancelled);
    }
    log_summary(&report);

    if opts.dry_run {
        info!("Dry run: index not written");
    } else {
        phase.advance(ScanPhase::Persisting);
        let records = Arc::try_unwrap(index)
            .map(FingerprintIndex::into_records)
            .unwrap_or_else(|shared| shared.snapshot());
        persist_index(&opts.index_path, &records)?;
    }
    phase.advance(ScanPhase::Done);
    Ok(report)
}

fn log_summary(report: &ScanReport) {
    if report.duplicates.is_empty() {
        info!("No duplicate files found.");
    } else {
        info!("Duplicate files found:");
        for d in &report.duplicates {
            info!(
                "{} is a duplicate of {}",
                d.duplicate_path.display(),
                d.canonical_path.display()
            );
        }
    }
    info!(
        "{} files: {} new, {} re-registered, {} unchanged, {} duplicates",
        report.files_seen,
        report.registered,
        report.replaced_stale,
        report.unchanged,
        report.duplicates.len()
    );
    if report.read_failures + report.delete_failures + report.log_failures > 0 {
        warn!(
            "{} unreadable, {} failed deletions, {} unrecorded deletions",
            report.read_failures, report.delete_failures, report.log_failures
        );
    }
}
