use log::{debug, error};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::ScanReport;
use crate::error::ScanError;
use crate::pipeline::{self, WorkerContext};
use crate::utils::config::PATH_CHANNEL_CAP;

/// What to walk and how many workers to run.
pub struct PipelineSpec {
    /// Canonical scan root.
    pub root: PathBuf,
    pub recursive: bool,
    pub state_files: Vec<PathBuf>,
    pub exclude: Vec<String>,
    pub num_threads: usize,
}

/// Start the walk thread and the worker pool. Caller must [`drain_pipeline`] the handles.
pub fn run_pipeline(
    spec: PipelineSpec,
    workers: &WorkerContext,
    cancel: Arc<AtomicBool>,
) -> pipeline::PipelineHandles {
    debug!(
        "Starting {} workers ({} walk)",
        spec.num_threads,
        if spec.recursive { "recursive" } else { "top-level" }
    );
    let channels = pipeline::create_pipeline_channels(
        spec.root,
        spec.recursive,
        spec.state_files,
        spec.exclude,
        cancel,
        PATH_CHANNEL_CAP,
    );

    let walk_handle = pipeline::spawn_walk_thread(channels.path_tx, channels.ctx);
    // Workers own the only receivers; once they all exit, the walk's send fails and it stops.
    let worker_handles =
        pipeline::spawn_dedupe_workers(channels.path_rx, workers, spec.num_threads);

    pipeline::PipelineHandles {
        walk_handle,
        worker_handles,
        walk_errors: channels.walk_errors,
    }
}

/// Join walk and workers (full drain) and merge the per-worker reports.
///
/// Every thread is joined even after a panic; a panicked walk or worker then fails the drain
/// with [`ScanError::Incomplete`] so a partial scan is never persisted.
pub fn drain_pipeline(
    handles: pipeline::PipelineHandles,
    verbose: bool,
) -> Result<ScanReport, ScanError> {
    let pipeline::PipelineHandles {
        walk_handle,
        worker_handles,
        walk_errors,
    } = handles;

    let mut panicked = None;
    let sent = match walk_handle.join() {
        Ok(n) => n,
        Err(_) => {
            error!("walk thread panicked; scan covers only the files walked so far");
            panicked = Some("walk");
            0
        }
    };
    let mut report = ScanReport::default();
    for h in worker_handles {
        match h.join() {
            Ok(r) => report.merge(r),
            Err(_) => {
                error!("worker thread panicked; its counts are lost");
                panicked.get_or_insert("worker");
            }
        }
    }
    debug!(
        "main: pool drained, {} paths walked, {} processed",
        sent, report.files_seen
    );
    report.walk_errors = pipeline::report_walk_errors(&walk_errors, verbose);
    match panicked {
        Some(thread) => Err(ScanError::Incomplete(thread)),
        None => Ok(report),
    }
}
