use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::utils::config::PackagePaths;

/// Sibling temp path used while writing `final_path` (`<name>.tmp`).
pub fn temp_path_for(final_path: &Path) -> PathBuf {
    let name = final_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_else(|| PackagePaths::get().index_filename());
    final_path
        .parent()
        .unwrap_or(Path::new("."))
        .join(format!("{name}.tmp"))
}

/// Write `bytes` to the temp sibling of `final_path`, fsync, then rename over `final_path`.
/// An interrupted write leaves at most a stray `.tmp`; the final file is either old or new, never truncated.
pub fn write_atomic(final_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = final_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let temp_path = temp_path_for(final_path);
    let result = write_and_sync(&temp_path, bytes).and_then(|()| rename_temp_to_final(&temp_path, final_path));
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_and_sync(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

pub fn rename_temp_to_final(temp_path: &Path, final_path: &Path) -> std::io::Result<()> {
    fs::rename(temp_path, final_path)
}
