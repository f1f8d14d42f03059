//! Optimization control loop
//!
//! One run: dedup pre-pass, then up to `max_iterations` stateless oracle turns
//! whose actions are applied in order through the tool registry. The store is
//! the only state carried between turns.

use std::sync::Arc;

use shared::{logging, service_debug, service_info, service_warn, CaseName, CompletionState, OptimizationReport, ServiceId};

use super::locks::CaseLocks;
use super::prompts::{first_turn_prompt, CONTINUE_PROMPT, OPTIMIZATION_SYSTEM_PROMPT};
use super::state::RunState;
use super::tools::ToolRegistry;
use crate::config::Sampling;
use crate::error::{CuratorError, CuratorResult};
use crate::traits::{DecisionOracle, DecisionRequest, ItemStore};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerSettings {
    pub max_iterations: u32,
    pub sampling: Sampling,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            sampling: Sampling::OPTIMIZATION,
        }
    }
}

pub struct Optimizer<S, O>
where
    S: ItemStore + 'static,
    O: DecisionOracle + 'static,
{
    store: Arc<S>,
    oracle: Arc<O>,
    tools: ToolRegistry<S>,
    settings: OptimizerSettings,
    /// Held for a whole run so runs on one case never interleave
    run_locks: CaseLocks,
}

impl<S, O> Optimizer<S, O>
where
    S: ItemStore + 'static,
    O: DecisionOracle + 'static,
{
    pub fn new(store: Arc<S>, oracle: Arc<O>, settings: OptimizerSettings) -> Self {
        Self {
            tools: ToolRegistry::new(store.clone()),
            store,
            oracle,
            settings,
            run_locks: CaseLocks::new(),
        }
    }

    /// Run one optimization over `case`
    ///
    /// Fails only when the case document is absent or unreadable; everything
    /// the oracle does wrong ends up in the action log instead.
    pub async fn optimize(&self, case: &CaseName) -> CuratorResult<OptimizationReport> {
        let _run = self.run_locks.lock(case).await;

        // Read, dedup and rewrite happen under the store's case lock
        let dedup = self
            .store
            .deduplicate(case)
            .await?
            .ok_or_else(|| CuratorError::DocumentNotFound { case: case.to_string() })?;
        let original_count = dedup.items.len() + dedup.duplicates_removed;

        if original_count == 0 {
            service_info!(ServiceId::current(), "📭 Case '{}' has no items to optimize", case);
            return Ok(OptimizationReport {
                success: true,
                case_name: case.to_string(),
                original_item_count: 0,
                final_item_count: 0,
                items_removed: 0,
                duplicates_removed_preprocessing: 0,
                items_removed_by_agent: 0,
                iterations: 0,
                optimization_actions: Vec::new(),
                optimization_completed: false,
                completion_state: CompletionState::IdleStop,
                message: "No items to optimize".to_string(),
            });
        }

        logging::log_progress(ServiceId::current(), "Optimization", &format!("case '{case}' with {original_count} items"));

        if dedup.duplicates_removed > 0 {
            service_info!(
                ServiceId::current(),
                "🧹 Pre-processing removed {} obvious duplicates",
                dedup.duplicates_removed
            );
        }
        let deduplicated_count = dedup.items.len();

        let run = self.run_loop(case, deduplicated_count).await;
        let state = run.state();
        let iterations = run.iterations_run();

        let final_count = self.store.list(case).await?.len();
        let items_removed_by_agent = deduplicated_count.saturating_sub(final_count);

        service_info!(
            ServiceId::current(),
            "🏁 Run for '{}' ended {} after {} iterations: {} -> {} items",
            case,
            state,
            iterations,
            original_count,
            final_count
        );

        Ok(OptimizationReport {
            success: true,
            case_name: case.to_string(),
            original_item_count: original_count,
            final_item_count: final_count,
            items_removed: original_count.saturating_sub(final_count),
            duplicates_removed_preprocessing: dedup.duplicates_removed,
            items_removed_by_agent,
            iterations,
            optimization_actions: run.into_actions(),
            optimization_completed: state == CompletionState::Completed,
            completion_state: state,
            message: format!(
                "Optimization completed. Reduced from {original_count} to {final_count} items ({} by pre-processing, {items_removed_by_agent} by AI) in {iterations} iterations.",
                dedup.duplicates_removed
            ),
        })
    }

    async fn run_loop(&self, case: &CaseName, item_count: usize) -> RunState {
        let mut run = RunState::new(self.settings.max_iterations);
        let tools = self.tools.schemas();

        while run.begin_iteration() {
            service_debug!(ServiceId::current(), "🔁 Control iteration {}", run.iteration());

            let user = if run.iteration() == 1 {
                first_turn_prompt(case.as_str(), item_count)
            } else {
                CONTINUE_PROMPT.to_string()
            };
            let request = DecisionRequest {
                system: OPTIMIZATION_SYSTEM_PROMPT.to_string(),
                user,
                tools: tools.clone(),
                temperature: self.settings.sampling.temperature,
                max_tokens: self.settings.sampling.max_tokens,
            };

            let proposed = match self.oracle.propose_actions(&request).await {
                Ok(actions) => actions,
                Err(e) => {
                    service_warn!(ServiceId::current(), "⚠️ Oracle failed on iteration {}: {}", run.iteration(), e);
                    Vec::new()
                }
            };

            if proposed.is_empty() {
                run.finish_idle();
                break;
            }

            for action in proposed {
                let result = self.tools.execute(case, &action.name, &action.arguments).await;
                let succeeded = result.get("success").and_then(|v| v.as_bool()).unwrap_or(false);
                service_debug!(
                    ServiceId::current(),
                    "{} {} on iteration {}",
                    if succeeded { "✅" } else { "❌" },
                    action.name,
                    run.iteration()
                );

                if run.record(&action.name, action.arguments, result) {
                    break;
                }
            }
        }

        run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OracleFailure;
    use crate::traits::{MockDecisionOracle, MockItemStore, ProposedAction};
    use serde_json::json;
    use crate::core::DedupOutcome;
    use shared::DashboardItem;

    fn metric(id: &str, label: &str, value: &str) -> DashboardItem {
        serde_json::from_value(json!({
            "id": id,
            "component": {"type": "metric_card", "label": label, "value": value}
        }))
        .unwrap()
    }

    fn outcome(items: Vec<DashboardItem>, duplicates_removed: usize) -> DedupOutcome {
        DedupOutcome { items, duplicates_removed }
    }

    fn optimizer(store: MockItemStore, oracle: MockDecisionOracle, max_iterations: u32) -> Optimizer<MockItemStore, MockDecisionOracle> {
        let settings = OptimizerSettings {
            max_iterations,
            ..Default::default()
        };
        Optimizer::new(Arc::new(store), Arc::new(oracle), settings)
    }

    #[tokio::test]
    async fn test_absent_document_fails_the_run() {
        let mut store = MockItemStore::new();
        store.expect_deduplicate().returning(|_| Ok(None));
        let oracle = MockDecisionOracle::new();

        let err = optimizer(store, oracle, 5).optimize(&CaseName::from("C1")).await.unwrap_err();
        assert!(matches!(err, CuratorError::DocumentNotFound { .. }));
    }

    #[tokio::test]
    async fn test_empty_store_never_calls_the_oracle() {
        let mut store = MockItemStore::new();
        store.expect_deduplicate().returning(|_| Ok(Some(outcome(vec![], 0))));
        let mut oracle = MockDecisionOracle::new();
        oracle.expect_propose_actions().times(0);

        let report = optimizer(store, oracle, 5).optimize(&CaseName::from("C1")).await.unwrap();
        assert!(report.success);
        assert_eq!(report.iterations, 0);
        assert_eq!(report.message, "No items to optimize");
    }

    #[tokio::test]
    async fn test_oracle_failure_is_an_idle_stop() {
        let mut store = MockItemStore::new();
        store.expect_deduplicate().returning(|_| Ok(Some(outcome(vec![metric("a", "Revenue", "$5M")], 0))));
        store.expect_list().returning(|_| Ok(vec![metric("a", "Revenue", "$5M")]));
        let mut oracle = MockDecisionOracle::new();
        oracle
            .expect_propose_actions()
            .times(1)
            .returning(|_| Err(OracleFailure::ServiceUnavailable));

        let report = optimizer(store, oracle, 5).optimize(&CaseName::from("C1")).await.unwrap();
        assert_eq!(report.completion_state, CompletionState::IdleStop);
        assert_eq!(report.iterations, 1);
        assert_eq!(report.final_item_count, 1);
    }

    #[tokio::test]
    async fn test_busy_oracle_exhausts_the_cap() {
        let mut store = MockItemStore::new();
        store.expect_deduplicate().returning(|_| Ok(Some(outcome(vec![metric("a", "Revenue", "$5M")], 0))));
        store.expect_list().returning(|_| Ok(vec![metric("a", "Revenue", "$5M")]));
        let mut oracle = MockDecisionOracle::new();
        oracle.expect_propose_actions().times(3).returning(|_| {
            Ok(vec![ProposedAction::new("get_item_statistics", json!({"case_name": "C1"}))])
        });

        let report = optimizer(store, oracle, 3).optimize(&CaseName::from("C1")).await.unwrap();
        assert_eq!(report.completion_state, CompletionState::Exhausted);
        assert_eq!(report.iterations, 3);
        assert_eq!(report.optimization_actions.len(), 3);
        assert!(!report.optimization_completed);
    }

    #[tokio::test]
    async fn test_only_the_first_turn_states_the_item_count() {
        let mut store = MockItemStore::new();
        store.expect_deduplicate().returning(|_| Ok(Some(outcome(vec![metric("a", "Revenue", "$5M")], 0))));
        store.expect_list().returning(|_| Ok(vec![metric("a", "Revenue", "$5M")]));

        let mut oracle = MockDecisionOracle::new();
        let mut seq = mockall::Sequence::new();
        oracle
            .expect_propose_actions()
            .withf(|request| request.user.contains("Current item count: 1") && request.tools.len() == 7)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![ProposedAction::new("get_item_statistics", json!({"case_name": "C1"}))]));
        oracle
            .expect_propose_actions()
            .withf(|request| request.user == CONTINUE_PROMPT && request.temperature == 0.2)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(vec![]));

        let report = optimizer(store, oracle, 5).optimize(&CaseName::from("C1")).await.unwrap();
        assert_eq!(report.completion_state, CompletionState::IdleStop);
        assert_eq!(report.iterations, 2);
    }
}
