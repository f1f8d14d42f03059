//! Aggregate counts over a case's items

use serde::Serialize;
use shared::DashboardItem;
use std::collections::BTreeMap;

const UNKNOWN: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub id: String,
    pub created_at: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ItemStatistics {
    pub total_items: usize,
    pub by_type: BTreeMap<String, usize>,
    pub by_source_file: BTreeMap<String, usize>,
    pub by_size: BTreeMap<String, usize>,
    /// Items with a creation time, oldest first
    pub creation_timeline: Vec<TimelineEntry>,
}

impl ItemStatistics {
    pub fn collect(items: &[DashboardItem]) -> Self {
        let mut stats = ItemStatistics {
            total_items: items.len(),
            ..Default::default()
        };

        for item in items {
            let kind = item.component.kind().as_str().to_string();
            let source = item.source_file.clone().unwrap_or_else(|| UNKNOWN.to_string());
            let size = item.component.size.clone().unwrap_or_else(|| UNKNOWN.to_string());

            *stats.by_type.entry(kind.clone()).or_default() += 1;
            *stats.by_source_file.entry(source).or_default() += 1;
            *stats.by_size.entry(size).or_default() += 1;

            if !item.created_at.is_empty() {
                stats.creation_timeline.push(TimelineEntry {
                    id: item.id.clone(),
                    created_at: item.created_at.clone(),
                    kind,
                });
            }
        }

        // stable: equal timestamps keep store order
        stats.creation_timeline.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        stats
    }
}
