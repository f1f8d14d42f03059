//! Trait definitions with mockall annotations for testing
//!
//! The item store and the decision oracle are the two collaborators the
//! optimizer and the generator depend on. Both are injected so the loop can be
//! driven by scripted oracles and in-memory or temporary stores in tests.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::{CaseName, Component, DashboardItem, OptimizationLog};

use crate::core::DedupOutcome;
use crate::error::{CuratorResult, OracleFailure};

/// A function the oracle may call, in OpenAI "function tool" form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    /// JSON schema of the arguments object
    pub parameters: Value,
}

impl ToolSchema {
    pub fn new(name: &str, description: &str, parameters: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
        }
    }

    /// The `{"type": "function", "function": {...}}` wrapper used on the wire
    pub fn to_openai_tool(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// One stateless request to the oracle
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRequest {
    pub system: String,
    pub user: String,
    pub tools: Vec<ToolSchema>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// An action the oracle asked for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProposedAction {
    pub name: String,
    pub arguments: Value,
}

impl ProposedAction {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        Self { name: name.into(), arguments }
    }
}

/// Case-scoped persistence for dashboard items
///
/// Every mutation is a whole-document read-modify-write. Implementations must
/// serialize mutations on the same case.
#[mockall::automock]
#[async_trait::async_trait]
pub trait ItemStore: Send + Sync {
    /// Read the case document, `None` when it does not exist
    async fn load(&self, case: &CaseName) -> CuratorResult<Option<Vec<DashboardItem>>>;

    /// All items of a case in store order; empty when the document is absent
    async fn list(&self, case: &CaseName) -> CuratorResult<Vec<DashboardItem>>;

    /// Append one item, creating the document on demand
    async fn insert(&self, case: &CaseName, item: DashboardItem) -> CuratorResult<()>;

    /// Append a batch of items in one write, creating the document on demand
    async fn append_batch(&self, case: &CaseName, items: Vec<DashboardItem>) -> CuratorResult<()>;

    /// Replace the component of an item and stamp the update metadata
    ///
    /// # Returns
    /// The updated item, or `ItemNotFound`/`DocumentNotFound`
    async fn update(&self, case: &CaseName, item_id: &str, component: Component, reason: &str) -> CuratorResult<DashboardItem>;

    /// Remove an item permanently
    ///
    /// # Returns
    /// Number of items remaining, or `ItemNotFound`/`DocumentNotFound`
    async fn delete(&self, case: &CaseName, item_id: &str, reason: &str) -> CuratorResult<usize>;

    /// Append a consolidated item recording its sources, returning the new id
    async fn append_consolidated(
        &self,
        case: &CaseName,
        component: Component,
        source_item_ids: Vec<String>,
        reason: &str,
    ) -> CuratorResult<String>;

    /// Drop exact duplicates from the case document in one locked read-modify-write
    ///
    /// # Returns
    /// The surviving items and the number removed, `None` when the document
    /// does not exist. Nothing is written when no duplicates were found.
    async fn deduplicate(&self, case: &CaseName) -> CuratorResult<Option<DedupOutcome>>;

    /// Persist the run summary, overwriting any previous one
    async fn save_optimization_log(&self, case: &CaseName, log: OptimizationLog) -> CuratorResult<()>;

    async fn load_optimization_log(&self, case: &CaseName) -> CuratorResult<Option<OptimizationLog>>;
}

/// External decision-making capability
///
/// Given instructions and a tool set, returns zero or more actions. Output is
/// non-deterministic and may be empty.
#[mockall::automock]
#[async_trait::async_trait]
pub trait DecisionOracle: Send + Sync {
    async fn propose_actions(&self, request: &DecisionRequest) -> Result<Vec<ProposedAction>, OracleFailure>;
}
