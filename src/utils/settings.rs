//! Settings file (`nodupe.toml` in the state directory). CLI only; lib callers build
//! [`ScanSettings`] and [`Opts`] directly.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::ScanError;
use crate::{Opts, ScanSettings};

/// Written when no settings file exists so the user has something to edit.
pub const DEFAULT_SETTINGS_TOML: &str = r#"# nodupe settings. Command-line flags override these values.
[settings]
# Directory to scan for duplicates (required unless passed on the command line).
directory = ""
# Descend into subdirectories.
recursive = true
# Glob patterns to skip, matched against file names and full paths.
exclude = []
"#;

#[derive(Debug, Default, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    directory: Option<String>,
    recursive: Option<bool>,
    exclude: Option<Vec<String>>,
    verbose: Option<bool>,
    threads: Option<usize>,
}

impl SettingsFile {
    /// Configured scan root, if any. An empty string counts as unset.
    pub fn directory(&self) -> Option<PathBuf> {
        self.settings
            .directory
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
    }

    pub fn recursive(&self) -> Option<bool> {
        self.settings.recursive
    }
}

/// Parse settings from a TOML string. Parse errors are configuration errors.
pub fn parse_settings(s: &str, origin: &Path) -> Result<SettingsFile, ScanError> {
    toml::from_str(s).map_err(|e| ScanError::Config(format!("{}: {}", origin.display(), e)))
}

/// Load the settings file. `Ok(None)` when it does not exist.
pub fn load_settings(path: &Path) -> Result<Option<SettingsFile>, ScanError> {
    match std::fs::read_to_string(path) {
        Ok(s) => parse_settings(&s, path).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(ScanError::Config(format!(
            "cannot read {}: {}",
            path.display(),
            e
        ))),
    }
}

/// Write [`DEFAULT_SETTINGS_TOML`] to `path` unless something is already there.
pub fn write_default_settings(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .and_then(|mut f| std::io::Write::write_all(&mut f, DEFAULT_SETTINGS_TOML.as_bytes()))
}

/// Build [`ScanSettings`]: CLI values win over the file; recursive defaults to true.
/// No directory from either source is a configuration error.
pub fn resolve_scan_settings(
    file: Option<&SettingsFile>,
    cli_dir: Option<&Path>,
    cli_recursive: Option<bool>,
) -> Result<ScanSettings, ScanError> {
    let root_directory = cli_dir
        .map(Path::to_path_buf)
        .or_else(|| file.and_then(SettingsFile::directory))
        .ok_or_else(|| {
            ScanError::Config(
                "no directory to scan: pass DIR or set `directory` under [settings]".to_string(),
            )
        })?;
    let recursive = cli_recursive
        .or_else(|| file.and_then(SettingsFile::recursive))
        .unwrap_or(true);
    Ok(ScanSettings {
        root_directory,
        recursive,
    })
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($sec:expr, $opts:expr, $sec_field:ident => $opts_field:ident) => {
        if let Some(v) = $sec.$sec_field.clone() {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file values to opts (only fields present in the file). Call before applying CLI.
pub fn apply_file_to_opts(file: &SettingsFile, opts: &mut Opts) {
    let sec = &file.settings;
    apply_file_opt!(sec, opts, exclude => exclude);
    apply_file_opt!(sec, opts, verbose => verbose);
    if let Some(n) = sec.threads {
        opts.num_threads = Some(n);
    }
}
