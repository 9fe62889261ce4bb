//! Application configuration constants.
//! File names, tuning and thresholds in one place.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived file names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    index_filename: String,
    settings_filename: String,
    log_filename: &'static str,
    run_log_filename: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                index_filename: format!("{pkg}-index.json"),
                settings_filename: format!("{pkg}.toml"),
                log_filename: "duplicates.txt",
                run_log_filename: format!("{pkg}.log"),
            }
        })
    }

    pub fn index_filename(&self) -> &str {
        &self.index_filename
    }

    pub fn settings_filename(&self) -> &str {
        &self.settings_filename
    }

    pub fn log_filename(&self) -> &str {
        self.log_filename
    }

    /// Diagnostic log of the current run (truncated at startup).
    pub fn run_log_filename(&self) -> &str {
        &self.run_log_filename
    }

    pub fn index_path_in(&self, state_dir: &Path) -> PathBuf {
        state_dir.join(self.index_filename())
    }

    pub fn settings_path_in(&self, state_dir: &Path) -> PathBuf {
        state_dir.join(self.settings_filename())
    }

    pub fn log_path_in(&self, state_dir: &Path) -> PathBuf {
        state_dir.join(self.log_filename())
    }

    pub fn run_log_path_in(&self, state_dir: &Path) -> PathBuf {
        state_dir.join(self.run_log_filename())
    }
}

// ---- Worker threads ----

/// Worker pool sizing. Use [`WorkerThreadLimits::current()`] to fill `all_threads` from rayon.
#[derive(Clone, Copy, Debug)]
pub struct WorkerThreadLimits {
    /// Available threads (from rayon); set by [`WorkerThreadLimits::current()`].
    pub all_threads: usize,
    /// Never run fewer workers than this.
    pub floor: usize,
}

impl Default for WorkerThreadLimits {
    fn default() -> Self {
        Self {
            all_threads: 0, // use current() to set from rayon
            floor: Self::FLOOR_THREADS,
        }
    }
}

impl WorkerThreadLimits {
    pub const FLOOR_THREADS: usize = 1;

    /// Build limits with `all_threads` set from `rayon::current_num_threads()`.
    pub fn current() -> Self {
        Self {
            all_threads: rayon::current_num_threads(),
            ..Self::default()
        }
    }

    /// Worker count for a scan: the override when given, otherwise all available threads.
    pub fn workers(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.all_threads).max(self.floor)
    }
}

// ---- Progress ----

pub struct ProgressConsts;

impl ProgressConsts {
    /// Files per progress bar update (reduce lock contention).
    pub const PROGRESS_UPDATE_BATCH_SIZE: usize = 32;
}

// ---- Hashing ----

pub struct HashingConsts;

impl HashingConsts {
    /// Block size for streaming file content into the hasher (bytes). 8 KiB.
    pub const READ_BLOCK_SIZE: usize = 8 * 1024;
}

// ---- Pipeline ----

/// Capacity of the walker → worker path channel. The walker blocks when it is full,
/// so memory stays bounded on very large trees.
pub const PATH_CHANNEL_CAP: usize = 4_096;
