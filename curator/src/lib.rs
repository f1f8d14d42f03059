//! Dashboard curation library
//!
//! Turns text documents into dashboard items through LLM function calling,
//! then consolidates a case's items with a dedup pre-pass followed by an
//! iterative oracle-driven control loop.

pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use config::{CuratorConfig, Sampling};
pub use core::{DocumentGenerator, Optimizer, OptimizerSettings, TextDocument, ToolRegistry};
pub use error::{CuratorError, CuratorResult, OracleFailure};
pub use traits::{DecisionOracle, DecisionRequest, ItemStore, ProposedAction, ToolSchema};
