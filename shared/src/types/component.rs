//! Typed dashboard components
//!
//! A component is the visual/data payload of a dashboard item. The persisted
//! JSON carries a `type` discriminator next to kind-specific fields; here that
//! becomes a closed sum type so every consumer matches on the kind instead of
//! probing string keys.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

use crate::errors::{SharedError, SharedResult};

/// Provenance entry attached to a component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRef {
    pub filename: String,
    #[serde(default)]
    pub relevance: String,
    #[serde(default)]
    pub key_insight: String,
}

/// One data point of a financial chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    #[serde(default)]
    pub market_share: String,
    #[serde(default)]
    pub key_strength: String,
    #[serde(default)]
    pub position: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Risk {
    pub title: String,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub description: String,
}

/// Kind-specific part of a component, discriminated by `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComponentBody {
    MetricCard {
        label: String,
        #[serde(deserialize_with = "text_or_number")]
        value: String,
        #[serde(default = "default_color")]
        color: String,
    },
    DataTable {
        title: String,
        #[serde(default)]
        headers: Vec<String>,
        #[serde(default)]
        rows: Vec<Vec<Value>>,
    },
    FinancialChart {
        title: String,
        #[serde(default)]
        data: Vec<ChartPoint>,
        #[serde(default = "default_chart_type")]
        chart_type: String,
    },
    ListItems {
        title: String,
        #[serde(default)]
        items: Vec<String>,
    },
    ShortText {
        title: String,
        #[serde(default)]
        content: String,
    },
    LongText {
        title: String,
        #[serde(default)]
        content: String,
    },
    TextAnalysis {
        title: String,
        #[serde(default)]
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        insights: Option<Vec<String>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        conclusion: Option<String>,
    },
    CompetitorAnalysis {
        title: String,
        #[serde(default)]
        competitors: Vec<Competitor>,
    },
    RiskAssessment {
        title: String,
        #[serde(default)]
        risks: Vec<Risk>,
    },
    ProgressBar {
        title: String,
        value: f64,
        #[serde(default = "default_max_value")]
        max_value: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(default = "default_color")]
        color: String,
    },
}

/// A dashboard component: the kind-specific body plus the fields every kind shares
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    #[serde(flatten)]
    pub body: ComponentBody,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceRef>,
}

/// The fixed set of component kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    MetricCard,
    DataTable,
    FinancialChart,
    ListItems,
    ShortText,
    LongText,
    TextAnalysis,
    CompetitorAnalysis,
    RiskAssessment,
    ProgressBar,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 10] = [
        ComponentKind::MetricCard,
        ComponentKind::DataTable,
        ComponentKind::FinancialChart,
        ComponentKind::ListItems,
        ComponentKind::ShortText,
        ComponentKind::LongText,
        ComponentKind::TextAnalysis,
        ComponentKind::CompetitorAnalysis,
        ComponentKind::RiskAssessment,
        ComponentKind::ProgressBar,
    ];

    /// The `type` discriminator used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::MetricCard => "metric_card",
            ComponentKind::DataTable => "data_table",
            ComponentKind::FinancialChart => "financial_chart",
            ComponentKind::ListItems => "list_items",
            ComponentKind::ShortText => "short_text",
            ComponentKind::LongText => "long_text",
            ComponentKind::TextAnalysis => "text_analysis",
            ComponentKind::CompetitorAnalysis => "competitor_analysis",
            ComponentKind::RiskAssessment => "risk_assessment",
            ComponentKind::ProgressBar => "progress_bar",
        }
    }

    pub fn from_wire(name: &str) -> Option<ComponentKind> {
        ComponentKind::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ComponentBody {
    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentBody::MetricCard { .. } => ComponentKind::MetricCard,
            ComponentBody::DataTable { .. } => ComponentKind::DataTable,
            ComponentBody::FinancialChart { .. } => ComponentKind::FinancialChart,
            ComponentBody::ListItems { .. } => ComponentKind::ListItems,
            ComponentBody::ShortText { .. } => ComponentKind::ShortText,
            ComponentBody::LongText { .. } => ComponentKind::LongText,
            ComponentBody::TextAnalysis { .. } => ComponentKind::TextAnalysis,
            ComponentBody::CompetitorAnalysis { .. } => ComponentKind::CompetitorAnalysis,
            ComponentBody::RiskAssessment { .. } => ComponentKind::RiskAssessment,
            ComponentBody::ProgressBar { .. } => ComponentKind::ProgressBar,
        }
    }

    fn title(&self) -> Option<&str> {
        match self {
            ComponentBody::MetricCard { .. } => None,
            ComponentBody::DataTable { title, .. }
            | ComponentBody::FinancialChart { title, .. }
            | ComponentBody::ListItems { title, .. }
            | ComponentBody::ShortText { title, .. }
            | ComponentBody::LongText { title, .. }
            | ComponentBody::TextAnalysis { title, .. }
            | ComponentBody::CompetitorAnalysis { title, .. }
            | ComponentBody::RiskAssessment { title, .. }
            | ComponentBody::ProgressBar { title, .. } => Some(title),
        }
    }

    fn label(&self) -> Option<&str> {
        match self {
            ComponentBody::MetricCard { label, .. } => Some(label),
            ComponentBody::ProgressBar { label, .. } => label.as_deref(),
            _ => None,
        }
    }
}

impl Component {
    pub fn new(body: ComponentBody) -> Self {
        Self { body, size: None, sources: Vec::new() }
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn with_source(mut self, source: SourceRef) -> Self {
        self.sources.push(source);
        self
    }

    /// Decode a component from untyped JSON (e.g. model-proposed arguments)
    pub fn from_value(value: Value) -> SharedResult<Self> {
        serde_json::from_value(value).map_err(|e| SharedError::InvalidComponent { message: e.to_string() })
    }

    pub fn kind(&self) -> ComponentKind {
        self.body.kind()
    }

    /// Title, falling back to the label when the title is empty or absent
    pub fn title_or_label(&self) -> &str {
        match self.body.title() {
            Some(title) if !title.is_empty() => title,
            _ => self.body.label().unwrap_or(""),
        }
    }

    /// The displayed value of a metric card
    pub fn metric_value(&self) -> Option<&str> {
        match &self.body {
            ComponentBody::MetricCard { value, .. } => Some(value),
            _ => None,
        }
    }
}

fn default_color() -> String {
    "blue".to_string()
}

fn default_chart_type() -> String {
    "bar".to_string()
}

fn default_max_value() -> f64 {
    100.0
}

/// Metric values are display strings, but models regularly emit bare numbers
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum TextOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match TextOrNumber::deserialize(deserializer)? {
        TextOrNumber::Text(text) => text,
        TextOrNumber::Number(number) => number.to_string(),
    })
}
