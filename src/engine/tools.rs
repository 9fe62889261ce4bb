//! Path and filter utilities

use std::path::{Path, PathBuf};

use crate::error::ScanError;

/// True if `path` currently exists and is a regular file (symlinks followed).
/// Any error while checking counts as "does not exist".
pub fn is_regular_file(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_file()).unwrap_or(false)
}

/// Returns true if the file at `path` should be fingerprinted.
/// `state_files` are our own index/log/settings paths (canonical), never candidates.
/// Everything else is a candidate unless an exclude pattern matches, dotfiles and OS metadata included.
pub fn should_include_in_walk(
    path: &Path,
    root: &Path,
    state_files: &[PathBuf],
    exclude_patterns: &[String],
) -> bool {
    if path == root {
        return false;
    }
    if state_files.iter().any(|s| s.as_path() == path) {
        return false;
    }
    if exclude_patterns.is_empty() {
        return true;
    }
    let name = match path.file_name().and_then(|n| n.to_str()) {
        Some(n) => n,
        None => return true,
    };
    let path_str = path.to_str().unwrap_or("");
    for pattern in exclude_patterns {
        if glob_match(pattern, name) || glob_match(pattern, path_str) {
            return false;
        }
    }
    true
}

/// Simple glob pattern matching (supports * and ?)
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.strip_prefix('!').unwrap_or(pattern).chars().collect();
    let text: Vec<char> = text.chars().collect();
    glob_match_chars(&pattern, &text)
}

/// Iterative, O(pattern × text): on a mismatch only the most recent `*` is widened by one char.
fn glob_match_chars(pattern: &[char], text: &[char]) -> bool {
    let (mut p, mut t) = (0, 0);
    // (index of the last `*`, text position it currently stretches to)
    let mut star: Option<(usize, usize)> = None;
    while t < text.len() {
        match pattern.get(p) {
            Some('*') => {
                star = Some((p, t));
                p += 1;
            }
            Some('?') => {
                p += 1;
                t += 1;
            }
            Some(c) if *c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match star {
                Some((star_p, star_t)) => {
                    star = Some((star_p, star_t + 1));
                    p = star_p + 1;
                    t = star_t + 1;
                }
                None => return false,
            },
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}

/// Canonicalize the scan root; it must be an existing directory.
pub fn check_root_and_canonicalize(path: &Path) -> Result<PathBuf, ScanError> {
    let root = path.canonicalize().map_err(|e| {
        ScanError::Config(format!("cannot resolve directory {}: {}", path.display(), e))
    })?;
    if !root.is_dir() {
        return Err(ScanError::Config(format!(
            "{} is not a directory",
            root.display()
        )));
    }
    Ok(root)
}

/// Canonical form of a state file path for comparison against walked paths.
/// The file may not exist yet, so only the parent directory is resolved.
pub fn canonicalize_state_path(path: &Path) -> Option<PathBuf> {
    if let Ok(p) = path.canonicalize() {
        return Some(p);
    }
    let name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    parent.canonicalize().ok().map(|p| p.join(name))
}
