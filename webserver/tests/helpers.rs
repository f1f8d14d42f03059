//! Test helper utilities for webserver integration tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use curator::services::JsonItemStore;
use curator::traits::MockDecisionOracle;
use curator::{ItemStore, OptimizerSettings, Sampling};
use shared::{CaseName, DashboardItem};
use webserver::{AppState, WebServer};

pub const CASE: &str = "C1";

/// A router over a fresh temporary store; keep the `TempDir` alive
pub fn test_router(oracle: MockDecisionOracle) -> (TempDir, Arc<JsonItemStore>, Router) {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(JsonItemStore::new(dir.path()));
    let state = AppState::new(
        store.clone(),
        Arc::new(oracle),
        OptimizerSettings::default(),
        Sampling::GENERATION,
    );
    let router = WebServer::new("127.0.0.1:0".parse().unwrap(), state).build_router();
    (dir, store, router)
}

/// An oracle that never proposes anything
pub fn idle_oracle() -> MockDecisionOracle {
    let mut oracle = MockDecisionOracle::new();
    oracle.expect_propose_actions().returning(|_| Ok(vec![]));
    oracle
}

pub fn metric(id: &str, label: &str, value: &str) -> DashboardItem {
    serde_json::from_value(json!({
        "id": id,
        "source_file": "report.txt",
        "created_at": "2024-01-01T00:00:00",
        "component": {"type": "metric_card", "label": label, "value": value}
    }))
    .unwrap()
}

pub async fn seed(store: &JsonItemStore, items: Vec<DashboardItem>) {
    store.append_batch(&CaseName::from(CASE), items).await.unwrap();
}

/// Send one request and decode the JSON body
pub async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
