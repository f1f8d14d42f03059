//! REST API handlers
//!
//! Case-scoped endpoints over the curator: items, documents, optimization.

use axum::extract::{Path, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use curator::{DecisionOracle, ItemStore, TextDocument};
use shared::{service_info, service_warn, CaseName, ServiceId};

use crate::error::{WebServerError, WebServerResult};
use crate::state::AppState;

const MANUAL_DELETE_REASON: &str = "manual";

type SharedState<S, O> = State<Arc<AppState<S, O>>>;

/// List items - GET /api/cases/:case/items
pub async fn list_items<S, O>(State(state): SharedState<S, O>, Path(case): Path<String>) -> WebServerResult<Json<Value>>
where
    S: ItemStore + 'static,
    O: DecisionOracle + 'static,
{
    let case = CaseName::new(case);
    let items = state.store.list(&case).await?;

    Ok(Json(json!({
        "case_name": case,
        "count": items.len(),
        "items": items
    })))
}

/// Delete one item - DELETE /api/cases/:case/items/:item_id
pub async fn delete_item<S, O>(
    State(state): SharedState<S, O>,
    Path((case, item_id)): Path<(String, String)>,
) -> WebServerResult<Json<Value>>
where
    S: ItemStore + 'static,
    O: DecisionOracle + 'static,
{
    let case = CaseName::new(case);
    let remaining = state.store.delete(&case, &item_id, MANUAL_DELETE_REASON).await?;
    service_info!(ServiceId::current(), "🗑️ Deleted item {} from case '{}'", item_id, case);

    Ok(Json(json!({
        "success": true,
        "message": format!("Deleted item {item_id}"),
        "remaining_items": remaining
    })))
}

/// Run one optimization - POST /api/cases/:case/optimize
pub async fn optimize<S, O>(State(state): SharedState<S, O>, Path(case): Path<String>) -> WebServerResult<Json<Value>>
where
    S: ItemStore + 'static,
    O: DecisionOracle + 'static,
{
    let case = CaseName::new(case);
    let report = state
        .optimizer
        .optimize(&case)
        .await
        .map_err(|e| WebServerError::OptimizationFailed(e.to_string()))?;

    Ok(Json(json!(report)))
}

/// Last persisted run summary - GET /api/cases/:case/optimization-log
pub async fn optimization_log<S, O>(
    State(state): SharedState<S, O>,
    Path(case): Path<String>,
) -> WebServerResult<Json<Value>>
where
    S: ItemStore + 'static,
    O: DecisionOracle + 'static,
{
    let case = CaseName::new(case);
    let log = state
        .store
        .load_optimization_log(&case)
        .await?
        .ok_or_else(|| WebServerError::NotFound(format!("No optimization log for case {case}")))?;

    Ok(Json(json!(log)))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRequest {
    pub filename: String,
    pub content: String,
    #[serde(default)]
    pub research_questions: Vec<String>,
}

/// Analyse a text document, then optimize the case - POST /api/cases/:case/documents
///
/// A failed optimization is reported in the body; the generated items stay.
pub async fn upload_document<S, O>(
    State(state): SharedState<S, O>,
    Path(case): Path<String>,
    Json(request): Json<DocumentRequest>,
) -> WebServerResult<Json<Value>>
where
    S: ItemStore + 'static,
    O: DecisionOracle + 'static,
{
    let case = CaseName::new(case);
    let document = TextDocument {
        filename: request.filename,
        content: request.content,
        research_questions: request.research_questions,
    };

    let items = state.generator.generate(&case, &document).await?;

    let optimization = match state.optimizer.optimize(&case).await {
        Ok(report) => json!(report),
        Err(e) => {
            service_warn!(ServiceId::current(), "⚠️ Optimization after upload failed for '{}': {}", case, e);
            json!({"success": false, "error": e.to_string()})
        }
    };

    Ok(Json(json!({
        "success": true,
        "items_created": items.len(),
        "message": format!("Created {} dashboard items from {}", items.len(), document.filename),
        "items": items,
        "optimization": optimization
    })))
}
