//! Fixed-weight similarity heuristic between two dashboard items
//!
//! | factor | weight |
//! |---|---|
//! | same component kind | 30 |
//! | Jaccard overlap of title words | up to 40 |
//! | same non-empty source file | 20 |
//! | two metric cards with the same non-empty value | 10 |

use serde::{Deserialize, Serialize};
use shared::{ComponentKind, DashboardItem};
use std::collections::HashSet;

const KIND_WEIGHT: f64 = 30.0;
const TITLE_WEIGHT: f64 = 40.0;
const SOURCE_WEIGHT: f64 = 20.0;
const VALUE_WEIGHT: f64 = 10.0;

/// Overlap above which the title factor is reported
const TITLE_FACTOR_THRESHOLD: f64 = 0.3;
const MERGE_ABOVE: f64 = 70.0;
const KEEP_SEPARATE_BELOW: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    Merge,
    KeepSeparate,
    Review,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityReport {
    /// In [0, 100]
    pub score: f64,
    pub factors: Vec<String>,
    pub recommendation: Recommendation,
}

/// Compact description of an item used in similarity results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub title: String,
}

impl ItemSummary {
    pub fn of(item: &DashboardItem) -> Self {
        let title = item.component.title_or_label();
        Self {
            id: item.id.clone(),
            kind: item.component.kind(),
            title: if title.is_empty() { "Untitled".to_string() } else { title.to_string() },
        }
    }
}

fn title_words(item: &DashboardItem) -> HashSet<String> {
    item.component
        .title_or_label()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Jaccard overlap of the two word sets, `None` when either is empty
fn word_overlap(a: &HashSet<String>, b: &HashSet<String>) -> Option<f64> {
    if a.is_empty() || b.is_empty() {
        return None;
    }
    let shared = a.intersection(b).count() as f64;
    let total = a.union(b).count() as f64;
    Some(shared / total)
}

pub fn score_pair(first: &DashboardItem, second: &DashboardItem) -> SimilarityReport {
    let mut score = 0.0;
    let mut factors = Vec::new();

    let kind = first.component.kind();
    if kind == second.component.kind() {
        score += KIND_WEIGHT;
        factors.push("Same component type".to_string());
    }

    if let Some(overlap) = word_overlap(&title_words(first), &title_words(second)) {
        score += overlap * TITLE_WEIGHT;
        if overlap > TITLE_FACTOR_THRESHOLD {
            factors.push(format!("Title word overlap: {overlap:.2}"));
        }
    }

    match (first.source_file.as_deref(), second.source_file.as_deref()) {
        (Some(a), Some(b)) if !a.is_empty() && a == b => {
            score += SOURCE_WEIGHT;
            factors.push("Same source file".to_string());
        }
        _ => {}
    }

    match (first.component.metric_value(), second.component.metric_value()) {
        (Some(a), Some(b)) if !a.is_empty() && a == b => {
            score += VALUE_WEIGHT;
            factors.push("Same metric value".to_string());
        }
        _ => {}
    }

    let recommendation = if score > MERGE_ABOVE {
        Recommendation::Merge
    } else if score < KEEP_SEPARATE_BELOW {
        Recommendation::KeepSeparate
    } else {
        Recommendation::Review
    };

    SimilarityReport {
        score: score.clamp(0.0, 100.0),
        factors,
        recommendation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn item(id: &str, source: Option<&str>, component: Value) -> DashboardItem {
        let mut raw = json!({"id": id, "component": component});
        if let Some(source) = source {
            raw["source_file"] = json!(source);
        }
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn test_identical_metric_cards_score_maximum() {
        let component = json!({"type": "metric_card", "label": "Global Market Size", "value": "$45.2B"});
        let a = item("a", Some("report.txt"), component.clone());
        let b = item("b", Some("report.txt"), component);

        let report = score_pair(&a, &b);
        assert_eq!(report.score, 100.0);
        assert_eq!(report.recommendation, Recommendation::Merge);
        assert_eq!(
            report.factors,
            [
                "Same component type",
                "Title word overlap: 1.00",
                "Same source file",
                "Same metric value"
            ]
        );
    }

    #[test]
    fn test_disjoint_items_score_zero() {
        let a = item("a", Some("one.txt"), json!({"type": "metric_card", "label": "Revenue", "value": "$5M"}));
        let b = item("b", Some("two.txt"), json!({"type": "list_items", "title": "Key risks", "items": []}));

        let report = score_pair(&a, &b);
        assert_eq!(report.score, 0.0);
        assert!(report.factors.is_empty());
        assert_eq!(report.recommendation, Recommendation::KeepSeparate);
    }

    #[test]
    fn test_partial_overlap_reviews() {
        // kind 30 + overlap 1/4 * 40, below the reported threshold
        let a = item("a", None, json!({"type": "short_text", "title": "Market outlook 2024", "content": ""}));
        let b = item("b", None, json!({"type": "short_text", "title": "Market risks", "content": ""}));

        let report = score_pair(&a, &b);
        assert!((report.score - 40.0).abs() < 1e-9);
        assert_eq!(report.factors, ["Same component type"]);
        assert_eq!(report.recommendation, Recommendation::Review);
    }

    #[test]
    fn test_title_comparison_is_case_insensitive() {
        let a = item("a", None, json!({"type": "short_text", "title": "Market Outlook"}));
        let b = item("b", None, json!({"type": "long_text", "title": "market outlook"}));

        let report = score_pair(&a, &b);
        assert_eq!(report.score, 40.0);
        assert_eq!(report.factors, ["Title word overlap: 1.00"]);
    }

    #[test]
    fn test_empty_titles_and_sources_do_not_score() {
        let a = item("a", Some(""), json!({"type": "short_text", "title": ""}));
        let b = item("b", Some(""), json!({"type": "long_text", "title": ""}));
        assert_eq!(score_pair(&a, &b).score, 0.0);
    }

    #[test]
    fn test_score_stays_within_bounds() {
        let samples = [
            item("a", Some("x"), json!({"type": "metric_card", "label": "A b c", "value": "1"})),
            item("b", Some("x"), json!({"type": "metric_card", "label": "a B", "value": "1"})),
            item("c", None, json!({"type": "progress_bar", "title": "", "label": "a", "value": 3})),
            item("d", Some("y"), json!({"type": "data_table", "title": "c d", "headers": [], "rows": []})),
        ];
        for first in &samples {
            for second in &samples {
                let score = score_pair(first, second).score;
                assert!((0.0..=100.0).contains(&score));
            }
        }
    }

    #[test]
    fn test_summary_falls_back_to_untitled() {
        let a = item("a", None, json!({"type": "short_text", "title": ""}));
        let summary = serde_json::to_value(ItemSummary::of(&a)).unwrap();
        assert_eq!(summary, json!({"id": "a", "type": "short_text", "title": "Untitled"}));
    }
}
