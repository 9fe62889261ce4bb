use std::sync::PoisonError;

use super::context::WalkErrors;

/// Summarize walk errors after the drain. Each error was already logged when it happened;
/// this adds a count, plus the full list in verbose mode. Returns the number of errors.
pub fn report_walk_errors(walk_errors: &WalkErrors, verbose: bool) -> usize {
    let errors = walk_errors.lock().unwrap_or_else(PoisonError::into_inner);
    if !errors.is_empty() {
        log::warn!(
            "Skipped {} paths due to permission errors or access issues",
            errors.len()
        );
        if verbose {
            for (path, msg) in errors.iter() {
                eprintln!("  skipped: {} ({})", path.display(), msg);
            }
        }
    }
    errors.len()
}
