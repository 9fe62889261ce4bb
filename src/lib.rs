//! nodupe: incremental duplicate file eliminator backed by a persistent content index

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod scan;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::{ExitStatus, ScanError};
pub use scan::{ScanPhase, run_scan};

use log::debug;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Result alias used by public nodupe API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Single entry point for library callers: scan `settings.root_directory`, delete duplicates
/// of already indexed content, and persist the index to `opts.index_path`.
///
/// No Ctrl+C handler is installed; use [`run_scan`] with your own flag to make the scan cancellable.
/// A returned error wraps a [`ScanError`]; use [`error::exit_status_for`] to classify it.
pub fn dedupe_dir(settings: &ScanSettings, opts: &Opts) -> Result<ScanReport> {
    debug!(
        "{} CONFIG:{:#?} {:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        settings,
        opts
    );
    let never_cancelled = Arc::new(AtomicBool::new(false));
    Ok(run_scan(settings, opts, never_cancelled)?)
}
