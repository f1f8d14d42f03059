//! The persisted dashboard item envelope

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::component::Component;
use super::{now_iso8601, CaseName};

/// `analysis_type` of items produced from a source document
pub const FILE_ANALYSIS: &str = "file_analysis";
/// `analysis_type` of items produced by consolidation
pub const CONSOLIDATED_ANALYSIS: &str = "consolidated_analysis";

/// One persisted unit: a typed component plus provenance and metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardItem {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_item_ids: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_type: Option<String>,
    pub component: Component,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

/// Facts about the document a generated item came from
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    pub filename: String,
    pub file_type: String,
    pub file_size: u64,
    pub analysis_query: String,
}

impl DashboardItem {
    /// Item produced by analysing a source document
    pub fn generated(case: &CaseName, document: &SourceDocument, component: Component) -> Self {
        let mut metadata = Map::new();
        metadata.insert("component_type".into(), Value::from(component.kind().as_str()));
        metadata.insert("file_type".into(), Value::from(document.file_type.as_str()));
        metadata.insert("file_size".into(), Value::from(document.file_size));
        metadata.insert("analysis_query".into(), Value::from(document.analysis_query.as_str()));

        Self {
            id: format!("{}_{}", case, Uuid::new_v4()),
            source_file: Some(document.filename.clone()),
            source_item_ids: None,
            created_at: now_iso8601(),
            analysis_type: Some(FILE_ANALYSIS.to_string()),
            component,
            metadata,
        }
    }

    /// Item replacing several existing items. The sources are recorded, not removed.
    pub fn consolidated(case: &CaseName, component: Component, source_item_ids: Vec<String>, reason: &str) -> Self {
        let mut metadata = Map::new();
        metadata.insert("component_type".into(), Value::from(component.kind().as_str()));
        metadata.insert("consolidation_reason".into(), Value::from(reason));
        metadata.insert("source_items_count".into(), Value::from(source_item_ids.len()));
        metadata.insert("created_by".into(), Value::from("control_agent"));

        Self {
            id: format!("{}_consolidated_{}", case, Uuid::new_v4()),
            source_file: None,
            source_item_ids: Some(source_item_ids),
            created_at: now_iso8601(),
            analysis_type: Some(CONSOLIDATED_ANALYSIS.to_string()),
            component,
            metadata,
        }
    }

    /// Swap in a new component, keeping id, creation time and provenance
    pub fn replace_component(&mut self, component: Component, reason: &str) {
        self.component = component;
        self.metadata.insert("last_updated".into(), Value::from(now_iso8601()));
        self.metadata.insert("update_reason".into(), Value::from(reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::component::ComponentBody;
    use serde_json::json;

    fn metric(label: &str, value: &str) -> Component {
        Component::new(ComponentBody::MetricCard {
            label: label.to_string(),
            value: value.to_string(),
            color: "blue".to_string(),
        })
    }

    #[test]
    fn test_consolidated_item_records_provenance() {
        let case = CaseName::from("acme");
        let item = DashboardItem::consolidated(&case, metric("Revenue", "$5M"), vec!["a".into(), "b".into()], "merge");

        assert!(item.id.starts_with("acme_consolidated_"));
        assert_eq!(item.source_item_ids.as_deref(), Some(&["a".to_string(), "b".to_string()][..]));
        assert_eq!(item.analysis_type.as_deref(), Some(CONSOLIDATED_ANALYSIS));
        assert_eq!(item.metadata["component_type"], "metric_card");
        assert_eq!(item.metadata["source_items_count"], 2);
        assert_eq!(item.metadata["created_by"], "control_agent");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let case = CaseName::from("acme");
        let document = SourceDocument {
            filename: "q3.txt".into(),
            file_type: "txt".into(),
            file_size: 120,
            analysis_query: "Analyze the document".into(),
        };
        let first = DashboardItem::generated(&case, &document, metric("A", "1"));
        let second = DashboardItem::generated(&case, &document, metric("A", "1"));

        assert_ne!(first.id, second.id);
        assert!(first.id.starts_with("acme_"));
        assert_eq!(first.source_file.as_deref(), Some("q3.txt"));
        assert_eq!(first.metadata["file_size"], 120);
    }

    #[test]
    fn test_replace_component_preserves_identity() {
        let case = CaseName::from("acme");
        let mut item = DashboardItem::consolidated(&case, metric("Revenue", "$5M"), vec![], "merge");
        let id = item.id.clone();
        let created_at = item.created_at.clone();

        item.replace_component(metric("Revenue FY", "$6M"), "fresher figure");

        assert_eq!(item.id, id);
        assert_eq!(item.created_at, created_at);
        assert_eq!(item.component.metric_value(), Some("$6M"));
        assert_eq!(item.metadata["update_reason"], "fresher figure");
        assert!(item.metadata.contains_key("last_updated"));
    }

    #[test]
    fn test_minimal_persisted_item_parses() {
        let item: DashboardItem = serde_json::from_value(json!({
            "id": "a",
            "component": {"type": "metric_card", "label": "Revenue", "value": "$5M"}
        }))
        .unwrap();

        assert_eq!(item.created_at, "");
        assert!(item.metadata.is_empty());
        assert!(item.source_file.is_none());
    }
}
