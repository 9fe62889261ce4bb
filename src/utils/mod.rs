pub mod config;
pub mod logger;
pub mod settings;
pub mod tempfiles;

pub use config::*;
pub use logger::{RunLogWriter, setup_logging};
pub use tempfiles::{temp_path_for, write_atomic};
