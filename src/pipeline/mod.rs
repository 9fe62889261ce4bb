//! Pipeline components: walk thread, bounded worker pool, drain.
//!
//! Walk → bounded path channel → N workers (fingerprint → resolve → policy) → join.

pub mod context;
pub mod error_handler;
pub mod orchestrator;
pub mod walk;
pub mod worker;

pub use context::{
    PipelineChannels, PipelineContext, PipelineHandles, WalkErrors, WorkerContext,
    create_pipeline_channels,
};
pub use error_handler::report_walk_errors;
pub use orchestrator::{PipelineSpec, drain_pipeline, run_pipeline};
pub use walk::{WalkOutcome, run_walk_loop, spawn_walk_thread, to_outcome_walkdir};
pub use worker::{process_file, spawn_dedupe_workers};
