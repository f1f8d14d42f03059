//! Control loop run state
//!
//! Tracks the iteration counter, the action log and the completion state of a
//! single optimization run. The transitions are kept free of I/O so the
//! termination rules can be tested on their own.

use serde_json::Value;
use shared::{ActionRecord, CompletionState};

use super::tools::Action;

#[derive(Debug, Clone)]
pub struct RunState {
    iteration: u32,
    max_iterations: u32,
    state: CompletionState,
    actions: Vec<ActionRecord>,
}

impl RunState {
    pub fn new(max_iterations: u32) -> Self {
        Self {
            iteration: 0,
            max_iterations,
            state: CompletionState::Running,
            actions: Vec::new(),
        }
    }

    /// Move to the next iteration
    ///
    /// # Returns
    /// `true` when the oracle should be queried, `false` once the cap is
    /// exceeded (the run is then `Exhausted`) or the run already ended
    pub fn begin_iteration(&mut self) -> bool {
        if self.state.is_terminal() {
            return false;
        }
        self.iteration += 1;
        if self.iteration > self.max_iterations {
            self.state = CompletionState::Exhausted;
            return false;
        }
        true
    }

    /// The oracle returned nothing this turn
    pub fn finish_idle(&mut self) {
        if !self.state.is_terminal() {
            self.state = CompletionState::IdleStop;
        }
    }

    /// Log an executed action
    ///
    /// # Returns
    /// `true` when the action successfully marked the run complete, in which
    /// case the rest of the turn must be skipped
    pub fn record(&mut self, function_name: &str, arguments: Value, result: Value) -> bool {
        let record = ActionRecord {
            iteration: self.iteration,
            function_name: function_name.to_string(),
            arguments,
            result,
        };
        let completes = function_name == Action::MarkOptimizationComplete.name() && record.succeeded();
        self.actions.push(record);

        if completes {
            self.state = CompletionState::Completed;
        }
        completes
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Number of oracle calls made so far
    pub fn iterations_run(&self) -> u32 {
        self.iteration.min(self.max_iterations)
    }

    pub fn state(&self) -> CompletionState {
        self.state
    }

    pub fn into_actions(self) -> Vec<ActionRecord> {
        self.actions
    }
}
