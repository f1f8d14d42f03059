//! Shared types for the dashboard curation system
//!
//! Contains the persisted data model (dashboard items and their typed
//! components), the records produced by an optimization run, the shared
//! error type and the logging setup used by every binary.

pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use errors::*;
pub use types::*;

pub use messages::{ActionRecord, CompletionState, OptimizationLog, OptimizationReport};
