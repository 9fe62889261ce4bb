//! Engine module: fingerprinting, the shared index, resolution policy and storage

pub mod arg_parser;
pub mod cli;
pub mod dup_log;
pub mod fingerprint_index;
pub mod hashing;
pub mod index_store;
pub mod policy;
pub mod progress;
pub mod tools;

// Re-export commonly used items
pub use arg_parser::Cli;
pub use dup_log::DuplicateLog;
pub use fingerprint_index::{FingerprintIndex, IndexRecords};
pub use hashing::{fingerprint, fingerprint_reader};
pub use index_store::{load_index, parse_index, persist_index, serialize_index};
pub use policy::{PolicyMode, PolicyOutcome, apply_decision};
pub use tools::{glob_match, is_regular_file, should_include_in_walk};
