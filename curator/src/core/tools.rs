//! Registry of the actions the optimization oracle may take
//!
//! Each action has a published schema, a typed argument struct and a handler
//! over the item store. Handler failures never escape: `execute` turns them
//! into `{"success": false, "error": ...}` results that go into the run's log.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;
use std::sync::Arc;

use shared::{now_iso8601, CaseName, Component, OptimizationLog};

use super::similarity::{score_pair, ItemSummary};
use super::statistics::ItemStatistics;
use crate::error::{CuratorError, CuratorResult};
use crate::traits::{ItemStore, ToolSchema};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ListDashboardItems,
    DeleteDashboardItem,
    UpdateDashboardItem,
    CreateConsolidatedItem,
    AnalyzeItemSimilarity,
    GetItemStatistics,
    MarkOptimizationComplete,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::ListDashboardItems,
        Action::DeleteDashboardItem,
        Action::UpdateDashboardItem,
        Action::CreateConsolidatedItem,
        Action::AnalyzeItemSimilarity,
        Action::GetItemStatistics,
        Action::MarkOptimizationComplete,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Action::ListDashboardItems => "list_dashboard_items",
            Action::DeleteDashboardItem => "delete_dashboard_item",
            Action::UpdateDashboardItem => "update_dashboard_item",
            Action::CreateConsolidatedItem => "create_consolidated_item",
            Action::AnalyzeItemSimilarity => "analyze_item_similarity",
            Action::GetItemStatistics => "get_item_statistics",
            Action::MarkOptimizationComplete => "mark_optimization_complete",
        }
    }

    pub fn from_name(name: &str) -> Option<Action> {
        Action::ALL.into_iter().find(|action| action.name() == name)
    }

    pub fn schema(&self) -> ToolSchema {
        let case_name = json!({"type": "string", "description": "The case name (e.g., 'C1')"});
        let component = |description: &str, required: Value| {
            json!({
                "type": "object",
                "description": description,
                "properties": {
                    "type": {"type": "string"},
                    "title": {"type": "string"},
                    "size": {"type": "string"},
                    "sources": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "filename": {"type": "string"},
                                "relevance": {"type": "string"},
                                "key_insight": {"type": "string"}
                            }
                        }
                    }
                },
                "required": required
            })
        };

        match self {
            Action::ListDashboardItems => ToolSchema::new(
                self.name(),
                "List all current dashboard items for analysis and management",
                json!({
                    "type": "object",
                    "properties": {"case_name": case_name},
                    "required": ["case_name"]
                }),
            ),
            Action::DeleteDashboardItem => ToolSchema::new(
                self.name(),
                "Delete a dashboard item that is duplicate, outdated, or redundant",
                json!({
                    "type": "object",
                    "properties": {
                        "case_name": case_name,
                        "item_id": {"type": "string", "description": "The ID of the dashboard item to delete"},
                        "reason": {
                            "type": "string",
                            "description": "Reason for deletion (e.g., 'duplicate', 'outdated', 'redundant', 'low-value')"
                        }
                    },
                    "required": ["case_name", "item_id", "reason"]
                }),
            ),
            Action::UpdateDashboardItem => ToolSchema::new(
                self.name(),
                "Update an existing dashboard item with new or corrected information",
                json!({
                    "type": "object",
                    "properties": {
                        "case_name": case_name,
                        "item_id": {"type": "string", "description": "The ID of the dashboard item to update"},
                        "updated_component": component(
                            "The updated component data (same structure as original component)",
                            json!(["type"])
                        ),
                        "update_reason": {
                            "type": "string",
                            "description": "Reason for the update (e.g., 'merged_duplicates', 'corrected_data', 'enhanced_content')"
                        }
                    },
                    "required": ["case_name", "item_id", "updated_component", "update_reason"]
                }),
            ),
            Action::CreateConsolidatedItem => ToolSchema::new(
                self.name(),
                "Create a new dashboard item that consolidates information from multiple existing items",
                json!({
                    "type": "object",
                    "properties": {
                        "case_name": case_name,
                        "component": component("The new consolidated component data", json!(["type", "title"])),
                        "source_item_ids": {
                            "type": "array",
                            "items": {"type": "string"},
                            "description": "List of item IDs that were consolidated into this new item"
                        },
                        "consolidation_reason": {
                            "type": "string",
                            "description": "Reason for consolidation (e.g., 'merged_similar_metrics', 'combined_related_analysis')"
                        }
                    },
                    "required": ["case_name", "component", "source_item_ids", "consolidation_reason"]
                }),
            ),
            Action::AnalyzeItemSimilarity => ToolSchema::new(
                self.name(),
                "Analyze similarity between dashboard items to identify duplicates or mergeable content",
                json!({
                    "type": "object",
                    "properties": {
                        "case_name": case_name,
                        "item_id_1": {"type": "string", "description": "First item ID to compare"},
                        "item_id_2": {"type": "string", "description": "Second item ID to compare"}
                    },
                    "required": ["case_name", "item_id_1", "item_id_2"]
                }),
            ),
            Action::GetItemStatistics => ToolSchema::new(
                self.name(),
                "Get statistics about dashboard items to help with optimization decisions",
                json!({
                    "type": "object",
                    "properties": {"case_name": case_name},
                    "required": ["case_name"]
                }),
            ),
            Action::MarkOptimizationComplete => ToolSchema::new(
                self.name(),
                "Mark the optimization process as complete when no more changes are needed",
                json!({
                    "type": "object",
                    "properties": {
                        "case_name": case_name,
                        "summary": {"type": "string", "description": "Summary of optimization actions taken"},
                        "final_item_count": {
                            "type": "integer",
                            "description": "Final number of dashboard items after optimization"
                        }
                    },
                    "required": ["case_name", "summary", "final_item_count"]
                }),
            ),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Deserialize)]
struct CaseArgs {
    case_name: String,
}

#[derive(Debug, Deserialize)]
struct DeleteArgs {
    case_name: String,
    item_id: String,
    reason: String,
}

#[derive(Debug, Deserialize)]
struct UpdateArgs {
    case_name: String,
    item_id: String,
    updated_component: Value,
    update_reason: String,
}

#[derive(Debug, Deserialize)]
struct ConsolidateArgs {
    case_name: String,
    component: Value,
    source_item_ids: Vec<String>,
    consolidation_reason: String,
}

#[derive(Debug, Deserialize)]
struct SimilarityArgs {
    case_name: String,
    item_id_1: String,
    item_id_2: String,
}

#[derive(Debug, Deserialize)]
struct CompleteArgs {
    case_name: String,
    summary: String,
    final_item_count: u64,
}

fn decode<T: DeserializeOwned>(arguments: &Value) -> CuratorResult<T> {
    T::deserialize(arguments).map_err(|e| CuratorError::invalid_argument(e.to_string()))
}

fn decode_component(value: Value) -> CuratorResult<Component> {
    Component::from_value(value).map_err(|e| CuratorError::invalid_argument(e.to_string()))
}

/// Dispatches oracle actions against the store of one case at a time
pub struct ToolRegistry<S: ItemStore> {
    store: Arc<S>,
}

impl<S: ItemStore> ToolRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Schemas offered to the oracle
    pub fn schemas(&self) -> Vec<ToolSchema> {
        Action::ALL.iter().map(Action::schema).collect()
    }

    /// Run an action for `case`, always producing a JSON result
    pub async fn execute(&self, case: &CaseName, name: &str, arguments: &Value) -> Value {
        match self.try_execute(case, name, arguments).await {
            Ok(result) => result,
            Err(e) => json!({"success": false, "error": e.to_string()}),
        }
    }

    async fn try_execute(&self, case: &CaseName, name: &str, arguments: &Value) -> CuratorResult<Value> {
        let action = Action::from_name(name).ok_or_else(|| CuratorError::UnknownAction { name: name.to_string() })?;

        match action {
            Action::ListDashboardItems => {
                let args: CaseArgs = decode(arguments)?;
                check_case(case, &args.case_name)?;
                self.list(case).await
            }
            Action::DeleteDashboardItem => {
                let args: DeleteArgs = decode(arguments)?;
                check_case(case, &args.case_name)?;
                let remaining = self.store.delete(case, &args.item_id, &args.reason).await?;
                Ok(json!({
                    "success": true,
                    "message": format!("Deleted item {}. Reason: {}", args.item_id, args.reason),
                    "remaining_items": remaining
                }))
            }
            Action::UpdateDashboardItem => {
                let args: UpdateArgs = decode(arguments)?;
                check_case(case, &args.case_name)?;
                let component = decode_component(args.updated_component)?;
                let updated = self.store.update(case, &args.item_id, component, &args.update_reason).await?;
                Ok(json!({
                    "success": true,
                    "message": format!("Updated item {}. Reason: {}", args.item_id, args.update_reason),
                    "updated_component": updated.component
                }))
            }
            Action::CreateConsolidatedItem => {
                let args: ConsolidateArgs = decode(arguments)?;
                check_case(case, &args.case_name)?;
                let component = decode_component(args.component)?;
                let source_count = args.source_item_ids.len();
                let new_id = self
                    .store
                    .append_consolidated(case, component, args.source_item_ids, &args.consolidation_reason)
                    .await?;
                Ok(json!({
                    "success": true,
                    "message": format!("Created consolidated item from {source_count} source items"),
                    "new_item_id": new_id,
                    "consolidation_reason": args.consolidation_reason
                }))
            }
            Action::AnalyzeItemSimilarity => {
                let args: SimilarityArgs = decode(arguments)?;
                check_case(case, &args.case_name)?;
                self.similarity(case, &args.item_id_1, &args.item_id_2).await
            }
            Action::GetItemStatistics => {
                let args: CaseArgs = decode(arguments)?;
                check_case(case, &args.case_name)?;
                let items = self.store.list(case).await?;
                Ok(json!({"success": true, "statistics": ItemStatistics::collect(&items)}))
            }
            Action::MarkOptimizationComplete => {
                let args: CompleteArgs = decode(arguments)?;
                check_case(case, &args.case_name)?;
                let log = OptimizationLog {
                    case_name: case.to_string(),
                    completed_at: now_iso8601(),
                    summary: args.summary.clone(),
                    final_item_count: args.final_item_count,
                    optimization_completed: true,
                };
                self.store.save_optimization_log(case, log).await?;
                Ok(json!({
                    "success": true,
                    "message": format!("Optimization completed for case {case}"),
                    "summary": args.summary,
                    "final_item_count": args.final_item_count,
                    "optimization_completed": true
                }))
            }
        }
    }

    async fn list(&self, case: &CaseName) -> CuratorResult<Value> {
        match self.store.load(case).await? {
            None => Ok(json!({
                "success": true,
                "items": [],
                "count": 0,
                "message": format!("No dashboard items found for case {case}")
            })),
            Some(items) => Ok(json!({
                "success": true,
                "count": items.len(),
                "message": format!("Retrieved {} dashboard items for case {case}", items.len()),
                "items": items
            })),
        }
    }

    async fn similarity(&self, case: &CaseName, first_id: &str, second_id: &str) -> CuratorResult<Value> {
        let items = self
            .store
            .load(case)
            .await?
            .ok_or_else(|| CuratorError::DocumentNotFound { case: case.to_string() })?;

        let find = |id: &str| items.iter().find(|item| item.id == id);
        let (Some(first), Some(second)) = (find(first_id), find(second_id)) else {
            return Err(CuratorError::ItemsNotFound {
                first: first_id.to_string(),
                second: second_id.to_string(),
            });
        };

        let report = score_pair(first, second);
        Ok(json!({
            "success": true,
            "similarity_score": report.score,
            "similarity_factors": report.factors,
            "recommendation": report.recommendation,
            "item1_summary": ItemSummary::of(first),
            "item2_summary": ItemSummary::of(second)
        }))
    }
}

fn check_case(expected: &CaseName, requested: &str) -> CuratorResult<()> {
    if expected.as_str() == requested {
        Ok(())
    } else {
        Err(CuratorError::CaseMismatch {
            expected: expected.to_string(),
            requested: requested.to_string(),
        })
    }
}
