use crossbeam_channel::Receiver;
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::thread::{self, JoinHandle};

use crate::engine::fingerprint_index::FingerprintIndex;
use crate::engine::hashing::fingerprint;
use crate::engine::policy::{PolicyMode, PolicyOutcome, apply_decision};
use crate::error::ScanError;
use crate::ScanReport;

use super::context::WorkerContext;

/// Fingerprint → resolve → policy for one file. Each step finishes before the next starts.
/// A read failure is returned as [`ScanError::FileIo`] and the file is left out of the index.
pub fn process_file(
    path: &Path,
    index: &FingerprintIndex,
    mode: PolicyMode<'_>,
) -> Result<PolicyOutcome, ScanError> {
    debug!("Processing file: {}", path.display());
    let digest = fingerprint(path).map_err(|e| ScanError::file_io("read", path, e))?;
    let decision = index.resolve(digest, path);
    debug!("{} -> {:?}", path.display(), decision);
    Ok(apply_decision(decision, path, mode))
}

/// Single worker: take paths until the channel closes or cancellation is requested.
/// A file already taken is always finished, so no single-file operation is left half-applied.
fn dedupe_worker_loop(path_rx: Receiver<PathBuf>, ctx: WorkerContext) -> ScanReport {
    let mode = match &ctx.log {
        Some(log) => PolicyMode::Apply(log.as_ref()),
        None => PolicyMode::DryRun,
    };
    let mut report = ScanReport::default();
    while let Ok(path) = path_rx.recv() {
        if ctx.cancel.load(Ordering::Relaxed) {
            break;
        }
        report.files_seen += 1;
        match process_file(&path, &ctx.index, mode) {
            Ok(outcome) => outcome.tally(&mut report),
            Err(e) => {
                warn!("{e}; skipping");
                report.read_failures += 1;
            }
        }
        ctx.progress.file_done();
    }
    report
}

/// Spawn `num_threads` workers sharing `path_rx`. They exit once the walk drops its sender.
pub fn spawn_dedupe_workers(
    path_rx: Receiver<PathBuf>,
    ctx: &WorkerContext,
    num_threads: usize,
) -> Vec<JoinHandle<ScanReport>> {
    (0..num_threads)
        .map(|_| {
            let path_rx = path_rx.clone();
            let ctx = ctx.clone();
            thread::spawn(move || dedupe_worker_loop(path_rx, ctx))
        })
        .collect()
}
