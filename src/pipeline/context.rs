//! Pipeline context: shared data passed into the walk thread and the workers.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::ScanReport;
use crate::engine::dup_log::DuplicateLog;
use crate::engine::fingerprint_index::FingerprintIndex;
use crate::engine::progress::ScanProgress;

/// Walk errors collected during a scan: (path or placeholder, message).
pub type WalkErrors = Arc<Mutex<Vec<(PathBuf, String)>>>;

/// Everything the walk thread needs: root, depth, filters, cancel flag and error sink.
pub struct PipelineContext {
    pub root: PathBuf,
    pub recursive: bool,
    /// Canonical paths of our own state files (index, its temp file, log, settings).
    pub state_files: Vec<PathBuf>,
    pub exclude: Vec<String>,
    pub cancel: Arc<AtomicBool>,
    pub walk_errors: WalkErrors,
}

/// Handles every worker holds. The index is shared; the log is absent in dry-run.
#[derive(Clone)]
pub struct WorkerContext {
    pub index: Arc<FingerprintIndex>,
    pub log: Option<Arc<DuplicateLog>>,
    pub progress: Arc<ScanProgress>,
    pub cancel: Arc<AtomicBool>,
}

/// Handles returned by [`run_pipeline`](super::run_pipeline); join them all to drain.
pub struct PipelineHandles {
    pub walk_handle: JoinHandle<usize>,
    pub worker_handles: Vec<JoinHandle<ScanReport>>,
    pub walk_errors: WalkErrors,
}

/// Channels and shared state for the pipeline. Walk thread gets path_tx + ctx; workers get path_rx.
pub struct PipelineChannels {
    pub path_tx: Sender<PathBuf>,
    pub path_rx: Receiver<PathBuf>,
    pub walk_errors: WalkErrors,
    pub ctx: PipelineContext,
}

pub fn create_pipeline_channels(
    root: PathBuf,
    recursive: bool,
    state_files: Vec<PathBuf>,
    exclude: Vec<String>,
    cancel: Arc<AtomicBool>,
    channel_cap: usize,
) -> PipelineChannels {
    let (path_tx, path_rx) = bounded::<PathBuf>(channel_cap);
    let walk_errors: WalkErrors = Arc::new(Mutex::new(Vec::new()));

    let ctx = PipelineContext {
        root,
        recursive,
        state_files,
        exclude,
        cancel,
        walk_errors: Arc::clone(&walk_errors),
    };

    PipelineChannels {
        path_tx,
        path_rx,
        walk_errors,
        ctx,
    }
}
