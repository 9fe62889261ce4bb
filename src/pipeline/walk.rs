//! Directory walker: streams regular files under the root into the path channel.

use crossbeam_channel::Sender;
use log::warn;
use std::path::PathBuf;
use std::sync::PoisonError;
use std::sync::atomic::Ordering;
use std::thread::{self, JoinHandle};
use walkdir::WalkDir;

use crate::engine::tools::{glob_match, should_include_in_walk};

use super::context::PipelineContext;

/// One result from a directory walk.
pub enum WalkOutcome {
    /// A regular file.
    File(PathBuf),
    /// Directory, symlink or other non-regular entry; never a candidate.
    NotAFile,
    Err { msg: String, path: Option<PathBuf> },
}

/// Convert a walkdir result into [`WalkOutcome`]. Links are not followed, so a symlink
/// (to a file or a directory) is reported as `NotAFile`.
pub fn to_outcome_walkdir(r: Result<walkdir::DirEntry, walkdir::Error>) -> WalkOutcome {
    match r {
        Ok(entry) if entry.file_type().is_file() => WalkOutcome::File(entry.into_path()),
        Ok(_) => WalkOutcome::NotAFile,
        Err(err) => WalkOutcome::Err {
            msg: format!("{}", err),
            path: err.path().map(PathBuf::from),
        },
    }
}

fn dir_is_excluded(entry: &walkdir::DirEntry, exclude: &[String]) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    exclude.iter().any(|p| glob_match(p, &name))
}

fn walkdir_iter(ctx: &PipelineContext) -> Box<dyn Iterator<Item = WalkOutcome>> {
    let max_depth = if ctx.recursive { usize::MAX } else { 1 };
    let exclude = ctx.exclude.clone();
    Box::new(
        WalkDir::new(&ctx.root)
            .min_depth(1)
            .max_depth(max_depth)
            .follow_links(false)
            .into_iter()
            .filter_entry(move |e| !dir_is_excluded(e, &exclude))
            .map(to_outcome_walkdir),
    )
}

pub fn spawn_walk_thread(path_tx: Sender<PathBuf>, ctx: PipelineContext) -> JoinHandle<usize> {
    thread::spawn(move || {
        let iter = walkdir_iter(&ctx);
        run_walk_loop(path_tx, &ctx, iter)
    })
}

/// Consume `iter`, send included files to `path_tx`, record errors in `ctx.walk_errors`.
/// Stops early when cancellation is requested or every worker has gone away.
/// Drops `path_tx` on return so workers drain and exit. Returns the number of paths sent.
pub fn run_walk_loop<I>(path_tx: Sender<PathBuf>, ctx: &PipelineContext, iter: I) -> usize
where
    I: Iterator<Item = WalkOutcome>,
{
    let mut count = 0_usize;
    for outcome in iter {
        if ctx.cancel.load(Ordering::Relaxed) {
            break;
        }
        match outcome {
            WalkOutcome::File(path) => {
                if should_include_in_walk(&path, &ctx.root, &ctx.state_files, &ctx.exclude) {
                    if path_tx.send(path).is_err() {
                        break;
                    }
                    count += 1;
                }
            }
            WalkOutcome::NotAFile => {}
            WalkOutcome::Err { msg, path } => {
                warn!("Error walking directory: {}", msg);
                let path = path.unwrap_or_else(|| PathBuf::from("<no-path>"));
                ctx.walk_errors
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .push((path, msg));
            }
        }
    }
    drop(path_tx);
    count
}
