//! Error taxonomy for a scan and the process exit status each one maps to.

use std::path::PathBuf;

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success = 0,
    /// Unexpected failure, including failure to persist the index.
    GeneralError = 1,
    /// Missing or invalid settings.
    ConfigError = 2,
    /// Persisted index exists but cannot be read or parsed.
    IndexCorrupt = 3,
    /// Interrupted by Ctrl+C (128 + SIGINT).
    Cancelled = 130,
}

impl ExitStatus {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Errors raised by the dedup engine.
///
/// Only `Config`, `IndexCorrupt`, `StorageWrite` (at open/persist time), `Incomplete` and
/// `Cancelled` end a scan. `FileIo` is per-file: workers log it and move on.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("index {} is corrupt: {reason}", .path.display())]
    IndexCorrupt { path: PathBuf, reason: String },

    #[error("failed to {op} {}: {io}", .path.display())]
    FileIo {
        op: &'static str,
        path: PathBuf,
        io: std::io::Error,
    },

    #[error("failed to write {what} {}: {io}", .path.display())]
    StorageWrite {
        what: &'static str,
        path: PathBuf,
        io: std::io::Error,
    },

    /// A pipeline thread panicked, so some files may never have been looked at.
    #[error("{0} thread panicked; scan is incomplete and the index was not written")]
    Incomplete(&'static str),

    #[error("scan cancelled by user; index was not written")]
    Cancelled,
}

impl ScanError {
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            ScanError::Config(_) => ExitStatus::ConfigError,
            ScanError::IndexCorrupt { .. } => ExitStatus::IndexCorrupt,
            ScanError::FileIo { .. }
            | ScanError::StorageWrite { .. }
            | ScanError::Incomplete(_) => ExitStatus::GeneralError,
            ScanError::Cancelled => ExitStatus::Cancelled,
        }
    }

    pub(crate) fn file_io(op: &'static str, path: impl Into<PathBuf>, io: std::io::Error) -> Self {
        ScanError::FileIo {
            op,
            path: path.into(),
            io,
        }
    }

    pub(crate) fn storage_write(
        what: &'static str,
        path: impl Into<PathBuf>,
        io: std::io::Error,
    ) -> Self {
        ScanError::StorageWrite {
            what,
            path: path.into(),
            io,
        }
    }
}

/// Exit status for an error surfaced at the binary boundary.
/// Looks for a [`ScanError`] anywhere in the chain; anything else is a general error.
pub fn exit_status_for(err: &anyhow::Error) -> ExitStatus {
    err.chain()
        .find_map(|e| e.downcast_ref::<ScanError>())
        .map(ScanError::exit_status)
        .unwrap_or(ExitStatus::GeneralError)
}
