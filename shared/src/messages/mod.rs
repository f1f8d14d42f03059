//! Records exchanged between the optimizer and its callers
//!
//! - `optimization`: the action log, persisted run summary and run report

pub mod optimization;

pub use optimization::{ActionRecord, CompletionState, OptimizationLog, OptimizationReport};
