use clap::Parser;
use std::path::PathBuf;

use crate::utils::config::PackagePaths;

struct DefaultArgs;

impl DefaultArgs {
    pub const STATE_DIR: &'static str = ".";
}

/// Incremental duplicate file eliminator.
#[derive(Clone, Debug, Parser)]
#[command(name = "nodupe")]
#[command(
    about = "Delete files whose content duplicates an already indexed file; every deletion is logged."
)]
pub struct Cli {
    /// Directory to scan. Default: `directory` from the settings file.
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Directory holding the index, duplicate log and settings file. Default: current directory.
    #[arg(long, short = 's', default_value = DefaultArgs::STATE_DIR)]
    pub state_dir: PathBuf,

    /// Path to the fingerprint index. Default: `nodupe-index.json` in the state directory.
    #[arg(long, short = 'i')]
    pub index: Option<PathBuf>,

    /// Path to the duplicate log. Default: `duplicates.txt` in the state directory.
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Path to the settings file. Default: `nodupe.toml` in the state directory.
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Diagnostic log for this run, truncated at startup. Default: `nodupe.log` in the state directory.
    #[arg(long)]
    pub run_log: Option<PathBuf>,

    /// Descend into subdirectories (default true, or `recursive` from the settings file).
    #[arg(long, short = 'r', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub recursive: Option<bool>,

    /// Worker thread count. Default: available parallelism.
    #[arg(long, short = 't', value_parser = clap::value_parser!(usize))]
    pub threads: Option<usize>,

    /// Exclude patterns (glob syntax). Can specify multiple: -e pattern1 pattern2 pattern3
    #[arg(long, short = 'e', num_args = 1..)]
    pub exclude: Vec<String>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,

    /// Report duplicates without deleting them; the index and log are not written.
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    pub fn index_path(&self) -> PathBuf {
        self.index
            .clone()
            .unwrap_or_else(|| PackagePaths::get().index_path_in(&self.state_dir))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log
            .clone()
            .unwrap_or_else(|| PackagePaths::get().log_path_in(&self.state_dir))
    }

    pub fn settings_path(&self) -> PathBuf {
        self.settings
            .clone()
            .unwrap_or_else(|| PackagePaths::get().settings_path_in(&self.state_dir))
    }

    pub fn run_log_path(&self) -> PathBuf {
        self.run_log
            .clone()
            .unwrap_or_else(|| PackagePaths::get().run_log_path_in(&self.state_dir))
    }
}
