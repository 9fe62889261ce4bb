//! nodupe CLI: scan a directory, delete duplicates of indexed content, log each deletion.

use clap::Parser;
use nodupe::engine::arg_parser::Cli;
use nodupe::engine::cli::handle_run;
use nodupe::error::{ExitStatus, exit_status_for};
use std::process::ExitCode;
use std::time::Instant;

fn main() -> ExitCode {
    let start_time = Instant::now();
    let cli = Cli::parse();
    let status = match handle_run(&cli) {
        Ok(_) => ExitStatus::Success,
        Err(err) => {
            let status = exit_status_for(&err);
            match status {
                ExitStatus::Cancelled => log::warn!("{:#}", err),
                _ => log::error!("{:#}", err),
            }
            status
        }
    };
    log::debug!("Total time: {:?}", start_time.elapsed());
    ExitCode::from(status.code())
}
