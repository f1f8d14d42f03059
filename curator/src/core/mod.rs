//! Core curation logic
//!
//! Everything here talks to the outside world only through the
//! `ItemStore` and `DecisionOracle` traits.

pub mod dedup;
pub mod generation;
pub mod locks;
pub mod optimizer;
pub mod prompts;
pub mod similarity;
pub mod state;
pub mod statistics;
pub mod tools;

pub use dedup::{deduplicate, DedupOutcome};
pub use generation::{DocumentGenerator, TextDocument};
pub use locks::CaseLocks;
pub use optimizer::{Optimizer, OptimizerSettings};
pub use similarity::{score_pair, Recommendation, SimilarityReport};
pub use state::RunState;
pub use statistics::ItemStatistics;
pub use tools::{Action, ToolRegistry};
