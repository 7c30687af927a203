//! Batch processing pipeline

pub mod orchestrator;

pub use orchestrator::{process_file, run, run_with, PipelineResult};
