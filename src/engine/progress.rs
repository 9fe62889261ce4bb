//! Progress counter shown in verbose mode

use kdam::{Animation, Bar, BarExt};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub type ProgressBar = Arc<Mutex<Bar>>;

/// Create a counter for unknown total (shows count without percentage).
/// The walk is streamed, so the number of files is never known up front.
pub fn create_counter(desc: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " files"
    )))
}

/// Force a refresh of the bar (e.g. so the counter shows "0 files" immediately).
pub fn refresh_bar(pb: &ProgressBar) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.refresh();
    }
}

/// Advance the bar by `n`. Uses try_lock so workers never block on it; a skipped
/// update is caught up by the next batch or the final flush.
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.update(n);
    }
}

/// Shared per-scan progress: a counter of files finished plus the optional bar.
pub struct ScanProgress {
    bar: Option<ProgressBar>,
    done: AtomicUsize,
    batch: usize,
}

impl ScanProgress {
    pub fn new(verbose: bool, batch: usize) -> Self {
        let bar = verbose.then(|| {
            let b = create_counter("Fingerprinting");
            refresh_bar(&b);
            b
        });
        Self {
            bar,
            done: AtomicUsize::new(0),
            batch: batch.max(1),
        }
    }

    /// Record one finished file; pushes to the bar once per batch.
    pub fn file_done(&self) {
        let count = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(bar) = &self.bar
            && count.is_multiple_of(self.batch)
        {
            update_progress_bar(bar, self.batch);
        }
    }

    pub fn done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    /// Final update for the remainder after batched updates (call once after the drain).
    pub fn finish(&self) {
        if let Some(bar) = &self.bar
            && let Ok(mut bar) = bar.lock()
        {
            let remaining = self.done() % self.batch;
            if remaining > 0 {
                let _ = bar.update(remaining);
            }
            let _ = bar.refresh();
            eprintln!();
        }
    }
}
