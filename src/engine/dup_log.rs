//! Append-only duplicate log, one line per deletion.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::DuplicateEntry;
use crate::error::ScanError;

/// Shared handle to the duplicate log. Opened in append mode, never truncated.
/// Each [`record`](Self::record) is one `write_all` of a complete line under a mutex,
/// so concurrent workers never interleave partial entries.
#[derive(Debug)]
pub struct DuplicateLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl DuplicateLog {
    pub fn open(path: &Path) -> Result<Self, ScanError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| ScanError::storage_write("duplicate log", path, e))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| ScanError::storage_write("duplicate log", path, e))?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry and flush it to disk.
    pub fn record(&self, entry: &DuplicateEntry) -> Result<(), ScanError> {
        let line = format!("{entry}\n");
        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        file.write_all(line.as_bytes())
            .and_then(|()| file.sync_data())
            .map_err(|e| ScanError::storage_write("duplicate log", &self.path, e))
    }
}
