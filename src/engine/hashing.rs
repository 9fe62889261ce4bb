//! File fingerprinting

use blake3::Hasher;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::Digest;
use crate::utils::config::HashingConsts;

/// Blake3 digest of the full content of `path`, streamed in fixed-size blocks.
/// Any open or read failure is returned; the caller treats the file as unprocessed.
pub fn fingerprint(path: &Path) -> std::io::Result<Digest> {
    let file = File::open(path)?;
    fingerprint_reader(file)
}

/// Same as [`fingerprint`] over any reader.
pub fn fingerprint_reader<R: Read>(mut reader: R) -> std::io::Result<Digest> {
    let mut hasher = Hasher::new();
    let mut buffer = [0u8; HashingConsts::READ_BLOCK_SIZE];
    loop {
        let n = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..n]);
    }
    Ok(Digest(*hasher.finalize().as_bytes()))
}
