//! Test helpers for curator tests
//!
//! `ScriptedOracle` plays back a fixed list of turns and records every
//! request it receives, which keeps control loop tests deterministic.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use curator::core::DedupOutcome;
use curator::services::JsonItemStore;
use curator::{
    CuratorResult, DecisionOracle, DecisionRequest, ItemStore, OracleFailure, Optimizer, OptimizerSettings,
    ProposedAction,
};
use shared::{CaseName, Component, DashboardItem, OptimizationLog};

/// Oracle that answers from a script; an exhausted script proposes nothing
#[derive(Default)]
pub struct ScriptedOracle {
    turns: Mutex<VecDeque<Result<Vec<ProposedAction>, OracleFailure>>>,
    requests: Mutex<Vec<DecisionRequest>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(self, actions: Vec<ProposedAction>) -> Self {
        self.push(Ok(actions));
        self
    }

    pub fn then_fail(self, failure: OracleFailure) -> Self {
        self.push(Err(failure));
        self
    }

    /// Repeat the same turn `times` times
    pub fn repeat(self, actions: Vec<ProposedAction>, times: usize) -> Self {
        for _ in 0..times {
            self.push(Ok(actions.clone()));
        }
        self
    }

    fn push(&self, turn: Result<Vec<ProposedAction>, OracleFailure>) {
        self.turns.lock().unwrap().push_back(turn);
    }

    pub fn requests(&self) -> Vec<DecisionRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl DecisionOracle for ScriptedOracle {
    async fn propose_actions(&self, request: &DecisionRequest) -> Result<Vec<ProposedAction>, OracleFailure> {
        self.requests.lock().unwrap().push(request.clone());
        self.turns.lock().unwrap().pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub struct TestHelpers;

impl TestHelpers {
    /// A JSON store rooted in a fresh temporary directory
    pub fn temp_store() -> (TempDir, Arc<JsonItemStore>) {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(JsonItemStore::new(dir.path()));
        (dir, store)
    }

    /// A temporary store already holding `items` for `case`
    pub async fn seeded_store(case: &CaseName, items: Vec<DashboardItem>) -> (TempDir, Arc<JsonItemStore>) {
        let (dir, store) = Self::temp_store();
        store.append_batch(case, items).await.unwrap();
        (dir, store)
    }

    pub fn optimizer(
        store: Arc<JsonItemStore>,
        oracle: Arc<ScriptedOracle>,
        max_iterations: u32,
    ) -> Optimizer<JsonItemStore, ScriptedOracle> {
        let settings = OptimizerSettings {
            max_iterations,
            ..Default::default()
        };
        Optimizer::new(store, oracle, settings)
    }

    pub fn action(name: &str, arguments: serde_json::Value) -> ProposedAction {
        ProposedAction::new(name, arguments)
    }

    pub fn ids(items: &[DashboardItem]) -> Vec<&str> {
        items.iter().map(|item| item.id.as_str()).collect()
    }
}

/// JSON store that issues a manual delete alongside every dedup pre-pass,
/// the way a DELETE request can arrive while a run is starting
pub struct ConcurrentDeleteStore {
    inner: Arc<JsonItemStore>,
    item_id: String,
}

impl ConcurrentDeleteStore {
    pub fn new(inner: Arc<JsonItemStore>, item_id: &str) -> Self {
        Self {
            inner,
            item_id: item_id.to_string(),
        }
    }
}

#[async_trait]
impl ItemStore for ConcurrentDeleteStore {
    async fn load(&self, case: &CaseName) -> CuratorResult<Option<Vec<DashboardItem>>> {
        self.inner.load(case).await
    }

    async fn list(&self, case: &CaseName) -> CuratorResult<Vec<DashboardItem>> {
        self.inner.list(case).await
    }

    async fn insert(&self, case: &CaseName, item: DashboardItem) -> CuratorResult<()> {
        self.inner.insert(case, item).await
    }

    async fn append_batch(&self, case: &CaseName, items: Vec<DashboardItem>) -> CuratorResult<()> {
        self.inner.append_batch(case, items).await
    }

    async fn update(&self, case: &CaseName, item_id: &str, component: Component, reason: &str) -> CuratorResult<DashboardItem> {
        self.inner.update(case, item_id, component, reason).await
    }

    async fn delete(&self, case: &CaseName, item_id: &str, reason: &str) -> CuratorResult<usize> {
        self.inner.delete(case, item_id, reason).await
    }

    async fn append_consolidated(
        &self,
        case: &CaseName,
        component: Component,
        source_item_ids: Vec<String>,
        reason: &str,
    ) -> CuratorResult<String> {
        self.inner.append_consolidated(case, component, source_item_ids, reason).await
    }

    async fn deduplicate(&self, case: &CaseName) -> CuratorResult<Option<DedupOutcome>> {
        let (outcome, deleted) = tokio::join!(
            self.inner.deduplicate(case),
            self.inner.delete(case, &self.item_id, "manual")
        );
        deleted?;
        outcome
    }

    async fn save_optimization_log(&self, case: &CaseName, log: OptimizationLog) -> CuratorResult<()> {
        self.inner.save_optimization_log(case, log).await
    }

    async fn load_optimization_log(&self, case: &CaseName) -> CuratorResult<Option<OptimizationLog>> {
        self.inner.load_optimization_log(case).await
    }
}
