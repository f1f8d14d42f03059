//! Liveness endpoint

use axum::response::Json;
use serde_json::{json, Value};

/// Health check endpoint - /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
