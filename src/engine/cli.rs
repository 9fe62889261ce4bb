//! CLI command handler: settings file + flags → one scan.

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::engine::arg_parser::Cli;
use crate::scan::{install_cancel_handler, run_scan};
use crate::utils::settings::{
    SettingsFile, apply_file_to_opts, load_settings, resolve_scan_settings, write_default_settings,
};
use crate::utils::setup_logging;
use crate::{Opts, ScanReport, ScanSettings};

/// Layer defaults < settings file < CLI flags.
pub fn build_opts(cli: &Cli, file: Option<&SettingsFile>) -> Opts {
    let mut opts = Opts {
        index_path: cli.index_path(),
        log_path: cli.log_path(),
        settings_path: Some(cli.settings_path()),
        run_log_path: Some(cli.run_log_path()),
        ..Opts::default()
    };
    if let Some(file) = file {
        apply_file_to_opts(file, &mut opts);
    }
    if let Some(v) = cli.verbose {
        opts.verbose = v;
    }
    if cli.threads.is_some() {
        opts.num_threads = cli.threads;
    }
    opts.exclude.extend(cli.exclude.iter().cloned());
    opts.dry_run = cli.dry_run;
    opts
}

/// Load settings (writing a template when absent) and resolve what to scan.
fn load_config(cli: &Cli) -> Result<(Opts, ScanSettings)> {
    let settings_path = cli.settings_path();
    let file = load_settings(&settings_path)?;
    let opts = build_opts(cli, file.as_ref());
    setup_logging(opts.verbose, opts.run_log_path.as_deref());

    if file.is_none() {
        warn!("{} not found", settings_path.display());
        match write_default_settings(&settings_path) {
            Ok(()) => info!("Created default settings at {}", settings_path.display()),
            Err(e) => warn!("Could not create {}: {}", settings_path.display(), e),
        }
    }
    let settings = resolve_scan_settings(file.as_ref(), cli.dir.as_deref(), cli.recursive)?;
    Ok((opts, settings))
}

/// Run one scan from the command line.
pub fn handle_run(cli: &Cli) -> Result<ScanReport> {
    let (opts, settings) = match load_config(cli) {
        Ok(v) => v,
        Err(e) => {
            // Logging may not be up yet when the settings file itself is broken.
            setup_logging(cli.verbose.unwrap_or(false), Some(&cli.run_log_path()));
            return Err(e);
        }
    };
    debug!(
        "{} CONFIG:{:#?} {:#?}",
        env!("CARGO_PKG_NAME").to_uppercase(),
        settings,
        opts
    );
    let cancel = install_cancel_handler().context("set Ctrl+C handler")?;
    let report = run_scan(&settings, &opts, cancel)?;
    Ok(report)
}
