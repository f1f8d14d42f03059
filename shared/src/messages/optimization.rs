//! Optimization run records

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One executed action, kept in memory for the duration of a run
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ActionRecord {
    pub iteration: u32,
    pub function_name: String,
    pub arguments: Value,
    pub result: Value,
}

impl ActionRecord {
    /// Whether the handler reported success
    pub fn succeeded(&self) -> bool {
        self.result.get("success").and_then(Value::as_bool).unwrap_or(false)
    }
}

/// Summary persisted once per completed run, overwriting the previous one
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OptimizationLog {
    pub case_name: String,
    pub completed_at: String,
    pub summary: String,
    pub final_item_count: u64,
    pub optimization_completed: bool,
}

/// Terminal (or current) state of the control loop
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    Running,
    /// The oracle signalled completion
    Completed,
    /// Iteration cap reached
    Exhausted,
    /// An iteration produced no actions
    IdleStop,
}

impl CompletionState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CompletionState::Running)
    }
}

impl fmt::Display for CompletionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionState::Running => write!(f, "running"),
            CompletionState::Completed => write!(f, "completed"),
            CompletionState::Exhausted => write!(f, "exhausted"),
            CompletionState::IdleStop => write!(f, "idle_stop"),
        }
    }
}

/// Outcome of one optimization run as returned to the caller
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct OptimizationReport {
    pub success: bool,
    pub case_name: String,
    /// Item count before the dedup pre-pass, so pre-pass removals stay visible
    pub original_item_count: usize,
    pub final_item_count: usize,
    pub items_removed: usize,
    pub duplicates_removed_preprocessing: usize,
    pub items_removed_by_agent: usize,
    pub iterations: u32,
    pub optimization_actions: Vec<ActionRecord>,
    pub optimization_completed: bool,
    pub completion_state: CompletionState,
    pub message: String,
}
