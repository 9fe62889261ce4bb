//! Persistent fingerprint index: a JSON object of hex digest → `{"path": ...}`.
//!
//! Read once at scan start, written once at scan end through a temp file + rename.
//! A missing file is an empty index; anything unreadable or unparsable is fatal.

use log::{info, warn};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::engine::fingerprint_index::IndexRecords;
use crate::error::ScanError;
use crate::utils::write_atomic;
use crate::{Digest, FileRecord};

/// Load the index at `path`. `Ok(empty)` when the file does not exist.
pub fn load_index(path: &Path) -> Result<IndexRecords, ScanError> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(
                "No index at {}; starting with an empty index",
                path.display()
            );
            return Ok(HashMap::new());
        }
        Err(e) => {
            return Err(ScanError::IndexCorrupt {
                path: path.to_path_buf(),
                reason: format!("unreadable: {e}"),
            });
        }
    };
    let records = parse_index(&bytes, path)?;
    info!(
        "Loaded {} fingerprints from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Parse index file content. `origin` is only used in error messages.
pub fn parse_index(bytes: &[u8], origin: &Path) -> Result<IndexRecords, ScanError> {
    let corrupt = |reason: String| ScanError::IndexCorrupt {
        path: origin.to_path_buf(),
        reason,
    };
    let stored: BTreeMap<String, FileRecord> =
        serde_json::from_slice(bytes).map_err(|e| corrupt(e.to_string()))?;
    let mut records = HashMap::with_capacity(stored.len());
    for (hex, record) in stored {
        let digest =
            Digest::from_hex(&hex).ok_or_else(|| corrupt(format!("invalid digest key {hex:?}")))?;
        records.insert(digest, record);
    }
    Ok(records)
}

/// Pretty JSON with keys sorted so successive index files diff cleanly.
/// Records whose path is not valid UTF-8 cannot be represented and are left out.
pub fn serialize_index(records: &IndexRecords) -> serde_json::Result<Vec<u8>> {
    let mut sorted: BTreeMap<String, &FileRecord> = BTreeMap::new();
    for (digest, record) in records {
        if record.path.to_str().is_none() {
            warn!(
                "Not persisting {}: path is not valid UTF-8",
                record.path.display()
            );
            continue;
        }
        sorted.insert(digest.to_hex(), record);
    }
    let mut out = serde_json::to_vec_pretty(&sorted)?;
    out.push(b'\n');
    Ok(out)
}

/// Serialize and atomically replace the index file at `path`.
pub fn persist_index(path: &Path, records: &IndexRecords) -> Result<(), ScanError> {
    let bytes = serialize_index(records)
        .map_err(|e| ScanError::storage_write("index", path, std::io::Error::from(e)))?;
    write_atomic(path, &bytes).map_err(|e| ScanError::storage_write("index", path, e))?;
    info!(
        "Wrote {} fingerprints to {}",
        records.len(),
        path.display()
    );
    Ok(())
}
