//! Deterministic exact-duplicate removal
//!
//! Runs once before the oracle is involved. Items are keyed by kind and
//! title-or-label (plus the displayed value for metric cards); the first
//! occurrence of a key in store order is kept. Provenance is not part of the key.

use shared::{ComponentKind, DashboardItem};
use std::collections::HashSet;

/// Result of one pre-pass
#[derive(Debug, Clone, PartialEq)]
pub struct DedupOutcome {
    pub items: Vec<DashboardItem>,
    pub duplicates_removed: usize,
}

/// Key two items must share to count as exact duplicates
pub fn dedup_key(item: &DashboardItem) -> String {
    let component = &item.component;
    let kind = component.kind();
    let title = component.title_or_label();

    match kind {
        ComponentKind::MetricCard => {
            format!("{}|{}|{}", kind, title, component.metric_value().unwrap_or(""))
        }
        _ => format!("{kind}|{title}"),
    }
}

/// Keep the first item of every key, in original order
pub fn deduplicate(items: Vec<DashboardItem>) -> DedupOutcome {
    let original = items.len();
    let mut seen = HashSet::with_capacity(original);

    let items: Vec<DashboardItem> = items.into_iter().filter(|item| seen.insert(dedup_key(item))).collect();

    DedupOutcome {
        duplicates_removed: original - items.len(),
        items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn item(id: &str, component: Value, created_at: &str) -> DashboardItem {
        serde_json::from_value(json!({"id": id, "created_at": created_at, "component": component})).unwrap()
    }

    fn metric(id: &str, label: &str, value: &str) -> DashboardItem {
        item(id, json!({"type": "metric_card", "label": label, "value": value}), "2024-01-01T00:00:00")
    }

    fn ids(items: &[DashboardItem]) -> Vec<&str> {
        items.iter().map(|item| item.id.as_str()).collect()
    }

    #[test]
    fn test_identical_metric_cards_collapse() {
        let outcome = deduplicate(vec![metric("a", "Revenue", "$5M"), metric("b", "Revenue", "$5M")]);
        assert_eq!(ids(&outcome.items), ["a"]);
        assert_eq!(outcome.duplicates_removed, 1);
    }

    #[test]
    fn test_metric_cards_with_different_values_survive() {
        let outcome = deduplicate(vec![metric("a", "Revenue", "$5M"), metric("b", "Revenue", "$6M")]);
        assert_eq!(outcome.duplicates_removed, 0);
    }

    #[test]
    fn test_first_occurrence_wins_regardless_of_timestamps() {
        let later = item("late", json!({"type": "short_text", "title": "Summary", "content": "x"}), "2025-06-01T00:00:00");
        let earlier = item("early", json!({"type": "short_text", "title": "Summary", "content": "y"}), "2020-01-01T00:00:00");

        let outcome = deduplicate(vec![later, earlier]);
        assert_eq!(ids(&outcome.items), ["late"]);
    }

    #[test]
    fn test_non_metric_kinds_ignore_content() {
        let a = item("a", json!({"type": "list_items", "title": "Drivers", "items": ["x"]}), "");
        let b = item("b", json!({"type": "list_items", "title": "Drivers", "items": ["y", "z"]}), "");
        let c = item("c", json!({"type": "long_text", "title": "Drivers", "content": "z"}), "");

        let outcome = deduplicate(vec![a, b, c]);
        assert_eq!(ids(&outcome.items), ["a", "c"]);
    }

    #[test]
    fn test_sources_are_not_part_of_the_key() {
        let a = item(
            "a",
            json!({"type": "short_text", "title": "Outlook", "sources": [{"filename": "one.txt"}]}),
            "",
        );
        let b = item(
            "b",
            json!({"type": "short_text", "title": "Outlook", "sources": [{"filename": "two.txt"}]}),
            "",
        );
        assert_eq!(deduplicate(vec![a, b]).duplicates_removed, 1);
    }

    #[test]
    fn test_second_pass_removes_nothing() {
        let first = deduplicate(vec![
            metric("a", "Revenue", "$5M"),
            metric("b", "Revenue", "$5M"),
            metric("c", "Cost", "$1M"),
            metric("d", "Cost", "$1M"),
        ]);
        let second = deduplicate(first.items.clone());

        assert_eq!(second.duplicates_removed, 0);
        assert_eq!(second.items, first.items);
    }

    #[test]
    fn test_key_shape() {
        assert_eq!(dedup_key(&metric("a", "Revenue", "$5M")), "metric_card|Revenue|$5M");
        let text = item("t", json!({"type": "short_text", "title": "Summary"}), "");
        assert_eq!(dedup_key(&text), "short_text|Summary");
    }
}
