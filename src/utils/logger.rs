use colored::Colorize;
use env_logger::{Builder, Target};
use log::Level;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

static LOGGER_INSTALLED: AtomicBool = AtomicBool::new(false);

/// Install the global logger. Safe to call more than once (later calls are ignored).
///
/// With `run_log`, every record is also written (without colour codes) to that file,
/// which is truncated first so it only ever holds the current run.
pub fn setup_logging(verbose: bool, run_log: Option<&Path>) {
    use log::LevelFilter;

    // A second call must not truncate the run log the first one opened.
    if LOGGER_INSTALLED.swap(true, Ordering::SeqCst) {
        return;
    }

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = Builder::from_default_env();
    builder
        .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
        .filter_module(env!("CARGO_PKG_NAME"), level) // Our crate: use requested level
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let line = match record.level() {
                Level::Error | Level::Warn => {
                    let level_str = match record.level() {
                        Level::Warn => "WARN".yellow(),
                        _ => "ERROR".red(),
                    };
                    let target = record.target().to_string().white();
                    format!(
                        "[{} {} {}] {}",
                        name.cyan(),
                        level_str,
                        target,
                        record.args()
                    )
                }
                Level::Debug | Level::Trace => {
                    format!("[{} {}] {}", name.cyan(), "DEBUG".dimmed(), record.args())
                }
                Level::Info => format!("[{}] {}", name.cyan(), record.args()),
            };
            writeln!(buf, "{}", line)
        });

    let mut open_error = None;
    if let Some(path) = run_log {
        match RunLogWriter::create(path) {
            Ok(writer) => {
                builder.target(Target::Pipe(Box::new(writer)));
            }
            Err(e) => open_error = Some(e),
        }
    }
    if builder.try_init().is_err() {
        return;
    }
    if let (Some(path), Some(e)) = (run_log, open_error) {
        log::warn!("Could not open run log {}: {}; logging to stderr only", path.display(), e);
    } else if let Some(path) = run_log {
        log::debug!("Run log: {}", path.display());
    }
}

/// Log sink that mirrors every record to stderr and to the run log file.
pub struct RunLogWriter {
    file: File,
}

impl RunLogWriter {
    /// Create or truncate the run log at `path`, creating its parent directory.
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            file: File::create(path)?,
        })
    }
}

impl Write for RunLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let _ = io::stderr().write_all(buf);
        self.file.write_all(&strip_ansi(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let _ = io::stderr().flush();
        self.file.flush()
    }
}

/// Drop `ESC [ ... <letter>` sequences so the file copy is plain text.
fn strip_ansi(buf: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(buf.len());
    let mut i = 0;
    while i < buf.len() {
        if buf[i] == 0x1b && buf.get(i + 1) == Some(&b'[') {
            i += 2;
            while i < buf.len() && !buf[i].is_ascii_alphabetic() {
                i += 1;
            }
            i += 1;
        } else {
            out.push(buf[i]);
            i += 1;
        }
    }
    out
}
