//! Test fixtures and data for curator tests

use serde_json::json;
use shared::{CaseName, DashboardItem};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const CASE: &'static str = "C1";
    pub const OTHER_CASE: &'static str = "C2";
    pub const API_KEY: &'static str = "test-openai-key";
    pub const MODEL: &'static str = "gpt-4o-test";

    pub fn case() -> CaseName {
        CaseName::from(Self::CASE)
    }

    /// A metric card item with a fixed creation time
    pub fn metric(id: &str, label: &str, value: &str) -> DashboardItem {
        serde_json::from_value(json!({
            "id": id,
            "source_file": "report.txt",
            "created_at": "2024-01-01T00:00:00",
            "analysis_type": "file_analysis",
            "component": {"type": "metric_card", "label": label, "value": value, "size": "small"}
        }))
        .unwrap()
    }

    /// A short text item with a fixed creation time
    pub fn short_text(id: &str, title: &str, content: &str) -> DashboardItem {
        serde_json::from_value(json!({
            "id": id,
            "source_file": "notes.md",
            "created_at": "2024-01-02T00:00:00",
            "analysis_type": "file_analysis",
            "component": {"type": "short_text", "title": title, "content": content}
        }))
        .unwrap()
    }

    /// Two exact duplicates followed by a distinct item
    pub fn items_with_duplicate() -> Vec<DashboardItem> {
        vec![
            Self::metric("a", "Revenue", "$5M"),
            Self::metric("b", "Revenue", "$5M"),
            Self::short_text("c", "Summary", "Strong quarter"),
        ]
    }

    /// A chat completion body carrying the given tool calls
    pub fn completion_with_calls(calls: &[(&str, serde_json::Value)]) -> serde_json::Value {
        let tool_calls: Vec<_> = calls
            .iter()
            .enumerate()
            .map(|(index, (name, arguments))| {
                json!({
                    "id": format!("call_{index}"),
                    "type": "function",
                    "function": {"name": name, "arguments": arguments.to_string()}
                })
            })
            .collect();

        json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": null, "tool_calls": tool_calls},
                "finish_reason": "tool_calls"
            }]
        })
    }
}
