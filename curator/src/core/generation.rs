//! Document to dashboard item generation
//!
//! The oracle is offered one `create_<kind>` function per component kind.
//! Each call it makes becomes a component (defaults filled in, provenance
//! attached) and the whole batch is appended to the case in one write.

use serde_json::{json, Map, Value};
use std::sync::Arc;

use shared::{
    service_info, service_warn, CaseName, Component, ComponentKind, DashboardItem, ServiceId, SourceDocument, SourceRef,
};

use super::prompts::{generation_system_prompt, generation_user_prompt};
use crate::config::Sampling;
use crate::error::{CuratorError, CuratorResult};
use crate::traits::{DecisionOracle, DecisionRequest, ItemStore, ToolSchema};

const TOOL_PREFIX: &str = "create_";

/// A plain-text document submitted for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct TextDocument {
    pub filename: String,
    pub content: String,
    pub research_questions: Vec<String>,
}

impl TextDocument {
    /// Lowercased extension, "unknown" when there is none
    pub fn file_type(&self) -> String {
        match self.filename.rsplit_once('.') {
            Some((_, ext)) if !ext.is_empty() => ext.to_lowercase(),
            _ => "unknown".to_string(),
        }
    }
}

/// Per-kind generation rules
struct KindRules {
    description: &'static str,
    required: &'static [&'static str],
    default_size: &'static str,
    sizes: &'static [&'static str],
    relevance: &'static str,
    insight_prefix: &'static str,
}

fn rules(kind: ComponentKind) -> KindRules {
    const ALL_SIZES: &[&str] = &["small", "medium", "large"];
    const WIDE_SIZES: &[&str] = &["medium", "large"];

    match kind {
        ComponentKind::MetricCard => KindRules {
            description: "Create a metric card to display a key performance indicator or important metric",
            required: &["label", "value"],
            default_size: "small",
            sizes: ALL_SIZES,
            relevance: "High",
            insight_prefix: "Metric",
        },
        ComponentKind::DataTable => KindRules {
            description: "Create a data table to display structured data in rows and columns",
            required: &["title", "headers", "rows"],
            default_size: "medium",
            sizes: WIDE_SIZES,
            relevance: "High",
            insight_prefix: "Table data",
        },
        ComponentKind::FinancialChart => KindRules {
            description: "Create a financial chart to visualize numerical data",
            required: &["title", "data"],
            default_size: "medium",
            sizes: WIDE_SIZES,
            relevance: "High",
            insight_prefix: "Chart data",
        },
        ComponentKind::ListItems => KindRules {
            description: "Create a bulleted list to display multiple related items",
            required: &["title", "items"],
            default_size: "medium",
            sizes: ALL_SIZES,
            relevance: "High",
            insight_prefix: "List",
        },
        ComponentKind::ShortText => KindRules {
            description: "Create a short text component for brief summaries or key points",
            required: &["title", "content"],
            default_size: "medium",
            sizes: ALL_SIZES,
            relevance: "Medium",
            insight_prefix: "Short text",
        },
        ComponentKind::LongText => KindRules {
            description: "Create a long text component for detailed analysis or explanations",
            required: &["title", "content"],
            default_size: "large",
            sizes: WIDE_SIZES,
            relevance: "High",
            insight_prefix: "Long text analysis",
        },
        ComponentKind::TextAnalysis => KindRules {
            description: "Create a comprehensive text analysis component with insights and conclusions",
            required: &["title", "content"],
            default_size: "large",
            sizes: WIDE_SIZES,
            relevance: "High",
            insight_prefix: "Analysis",
        },
        ComponentKind::CompetitorAnalysis => KindRules {
            description: "Create a competitor analysis component to compare market competitors",
            required: &["title", "competitors"],
            default_size: "large",
            sizes: WIDE_SIZES,
            relevance: "High",
            insight_prefix: "Competitor analysis",
        },
        ComponentKind::RiskAssessment => KindRules {
            description: "Create a risk assessment component to analyze potential risks",
            required: &["title", "risks"],
            default_size: "medium",
            sizes: ALL_SIZES,
            relevance: "High",
            insight_prefix: "Risk assessment",
        },
        ComponentKind::ProgressBar => KindRules {
            description: "Create a progress bar to show completion or achievement levels",
            required: &["title", "value"],
            default_size: "medium",
            sizes: ALL_SIZES,
            relevance: "Medium",
            insight_prefix: "Progress metric",
        },
    }
}

fn kind_properties(kind: ComponentKind) -> Value {
    let colors = json!(["blue", "green", "red", "orange", "purple"]);
    let string = |description: &str| json!({"type": "string", "description": description});

    match kind {
        ComponentKind::MetricCard => json!({
            "label": string("The label/title for the metric (e.g., 'Market Size by 2029', 'Growth Rate')"),
            "value": string("The metric value (e.g., '$45.2B', '23.5%', '1,250 units')"),
            "color": {"type": "string", "enum": colors, "description": "Color theme for the metric card"}
        }),
        ComponentKind::DataTable => json!({
            "title": string("Table title"),
            "headers": {"type": "array", "items": {"type": "string"}, "description": "List of column headers"},
            "rows": {
                "type": "array",
                "items": {"type": "array", "items": {"type": "string"}},
                "description": "List of rows, where each row is a list of cell values"
            }
        }),
        ComponentKind::FinancialChart => json!({
            "title": string("Chart title"),
            "data": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {"label": {"type": "string"}, "value": {"type": "number"}},
                    "required": ["label", "value"]
                },
                "description": "List of data points with label and value"
            },
            "chart_type": {"type": "string", "enum": ["bar", "line", "pie", "area"], "description": "Type of chart to display"}
        }),
        ComponentKind::ListItems => json!({
            "title": string("List title"),
            "items": {"type": "array", "items": {"type": "string"}, "description": "List of string items to display"}
        }),
        ComponentKind::ShortText => json!({
            "title": string("Text title"),
            "content": string("Text content (should be brief, 1-2 sentences)")
        }),
        ComponentKind::LongText => json!({
            "title": string("Text title"),
            "content": string("Text content (can be longer, multiple paragraphs)")
        }),
        ComponentKind::TextAnalysis => json!({
            "title": string("Analysis title"),
            "content": string("Main analysis content"),
            "insights": {"type": "array", "items": {"type": "string"}, "description": "Optional list of key insights"},
            "conclusion": string("Optional conclusion summary")
        }),
        ComponentKind::CompetitorAnalysis => json!({
            "title": string("Analysis title"),
            "competitors": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "market_share": {"type": "string"},
                        "key_strength": {"type": "string"},
                        "position": {"type": "string"}
                    },
                    "required": ["name", "market_share", "key_strength", "position"]
                },
                "description": "List of competitors with their details"
            }
        }),
        ComponentKind::RiskAssessment => json!({
            "title": string("Assessment title"),
            "risks": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": {"type": "string"},
                        "level": {"type": "string"},
                        "description": {"type": "string"}
                    },
                    "required": ["title", "level", "description"]
                },
                "description": "List of risks with their details"
            }
        }),
        ComponentKind::ProgressBar => json!({
            "title": string("Progress bar title"),
            "value": {"type": "number", "description": "Current value"},
            "max_value": {"type": "number", "description": "Maximum value (default 100.0)"},
            "label": string("Optional label to display with the progress"),
            "color": {"type": "string", "enum": colors, "description": "Color theme for the progress bar"}
        }),
    }
}

/// The `create_<kind>` function offered for one kind
pub fn generation_schema(kind: ComponentKind) -> ToolSchema {
    let rules = rules(kind);
    let mut properties = match kind_properties(kind) {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    properties.insert(
        "size".into(),
        json!({"type": "string", "enum": rules.sizes, "description": "Component size"}),
    );
    properties.insert(
        "source_filename".into(),
        json!({"type": "string", "description": "Source filename where this data came from"}),
    );
    properties.insert(
        "key_insight".into(),
        json!({"type": "string", "description": "Brief description of what this component represents"}),
    );

    ToolSchema::new(
        &format!("{TOOL_PREFIX}{kind}"),
        rules.description,
        json!({"type": "object", "properties": properties, "required": rules.required}),
    )
}

pub fn generation_schemas() -> Vec<ToolSchema> {
    ComponentKind::ALL.into_iter().map(generation_schema).collect()
}

/// Build a component from a `create_<kind>` call
pub fn build_component(function_name: &str, arguments: &Value) -> CuratorResult<Component> {
    let kind = function_name
        .strip_prefix(TOOL_PREFIX)
        .and_then(ComponentKind::from_wire)
        .ok_or_else(|| CuratorError::UnknownAction { name: function_name.to_string() })?;
    let rules = rules(kind);

    let mut fields = arguments
        .as_object()
        .cloned()
        .ok_or_else(|| CuratorError::invalid_argument(format!("{function_name} expects an object")))?;

    if let Some(missing) = rules.required.iter().find(|field| !fields.contains_key(**field)) {
        return Err(CuratorError::invalid_argument(format!("{function_name} requires '{missing}'")));
    }

    let take_text = |fields: &mut Map<String, Value>, key: &str| {
        fields
            .remove(key)
            .and_then(|v| v.as_str().map(str::to_string))
            .filter(|v| !v.is_empty())
    };
    let source_filename = take_text(&mut fields, "source_filename");
    let key_insight = take_text(&mut fields, "key_insight");

    fields.insert("type".into(), Value::from(kind.as_str()));

    let mut component =
        Component::from_value(Value::Object(fields)).map_err(|e| CuratorError::invalid_argument(e.to_string()))?;
    if component.size.is_none() {
        component = component.with_size(rules.default_size);
    }

    if let Some(filename) = source_filename {
        let key_insight = key_insight
            .unwrap_or_else(|| format!("{}: {}", rules.insight_prefix, component.title_or_label()));
        component.sources.clear();
        component = component.with_source(SourceRef {
            filename,
            relevance: rules.relevance.to_string(),
            key_insight,
        });
    }

    Ok(component)
}

pub struct DocumentGenerator<S, O>
where
    S: ItemStore + 'static,
    O: DecisionOracle + 'static,
{
    store: Arc<S>,
    oracle: Arc<O>,
    sampling: Sampling,
}

impl<S, O> DocumentGenerator<S, O>
where
    S: ItemStore + 'static,
    O: DecisionOracle + 'static,
{
    pub fn new(store: Arc<S>, oracle: Arc<O>, sampling: Sampling) -> Self {
        Self { store, oracle, sampling }
    }

    /// Analyse `document` and append the resulting items to `case`
    ///
    /// Calls that fail to build are skipped; an oracle failure fails the
    /// whole generation.
    pub async fn generate(&self, case: &CaseName, document: &TextDocument) -> CuratorResult<Vec<DashboardItem>> {
        if document.filename.trim().is_empty() {
            return Err(CuratorError::invalid_argument("filename must not be empty"));
        }

        let request = DecisionRequest {
            system: generation_system_prompt(&document.research_questions),
            user: generation_user_prompt(
                case.as_str(),
                &document.filename,
                &document.content,
                &document.research_questions,
            ),
            tools: generation_schemas(),
            temperature: self.sampling.temperature,
            max_tokens: self.sampling.max_tokens,
        };

        let proposed = self.oracle.propose_actions(&request).await?;

        let file_type = document.file_type();
        let mut items = Vec::with_capacity(proposed.len());
        for action in proposed {
            match build_component(&action.name, &action.arguments) {
                Ok(component) => {
                    let source = SourceDocument {
                        filename: document.filename.clone(),
                        file_type: file_type.clone(),
                        file_size: document.content.len() as u64,
                        analysis_query: format!("Extract {} insights from {}", component.kind(), document.filename),
                    };
                    items.push(DashboardItem::generated(case, &source, component));
                }
                Err(e) => {
                    service_warn!(ServiceId::current(), "⚠️ Skipping {} call: {}", action.name, e);
                }
            }
        }

        self.store.append_batch(case, items.clone()).await?;
        service_info!(
            ServiceId::current(),
            "📄 Generated {} items for case '{}' from {}",
            items.len(),
            case,
            document.filename
        );
        Ok(items)
    }
}
