//! JSON file backed item store
//!
//! Layout under the data directory:
//! - `<case>/items.json`: the ordered item array, pretty printed
//! - `<case>/optimization_log.json`: the last run summary
//!
//! Every mutation holds the case lock for the whole read-modify-write and
//! rewrites the document through a temp file and rename.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

use shared::{service_debug, CaseName, Component, DashboardItem, OptimizationLog, ServiceId};

use crate::core::{deduplicate, CaseLocks, DedupOutcome};
use crate::error::{CuratorError, CuratorResult};
use crate::traits::ItemStore;

const ITEMS_FILE: &str = "items.json";
const LOG_FILE: &str = "optimization_log.json";

pub struct JsonItemStore {
    base_dir: PathBuf,
    locks: CaseLocks,
}

impl JsonItemStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            locks: CaseLocks::new(),
        }
    }

    fn case_dir(&self, case: &CaseName) -> CuratorResult<PathBuf> {
        let name = case.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(CuratorError::invalid_argument(format!("Invalid case name: {name:?}")));
        }
        Ok(self.base_dir.join(name))
    }

    fn items_path(&self, case: &CaseName) -> CuratorResult<PathBuf> {
        Ok(self.case_dir(case)?.join(ITEMS_FILE))
    }

    fn log_path(&self, case: &CaseName) -> CuratorResult<PathBuf> {
        Ok(self.case_dir(case)?.join(LOG_FILE))
    }

    /// Items of a case without taking the lock; caller must hold it for mutations
    async fn read_items(&self, case: &CaseName) -> CuratorResult<Option<Vec<DashboardItem>>> {
        read_json(&self.items_path(case)?).await
    }

    async fn read_existing(&self, case: &CaseName) -> CuratorResult<Vec<DashboardItem>> {
        self.read_items(case)
            .await?
            .ok_or_else(|| CuratorError::DocumentNotFound { case: case.to_string() })
    }

    async fn write_items(&self, case: &CaseName, items: &[DashboardItem]) -> CuratorResult<()> {
        write_json(&self.items_path(case)?, &items).await?;
        service_debug!(ServiceId::current(), "💾 Wrote {} items for case '{}'", items.len(), case);
        Ok(())
    }

    async fn append(&self, case: &CaseName, new_items: Vec<DashboardItem>) -> CuratorResult<()> {
        let _guard = self.locks.lock(case).await;
        let mut items = self.read_items(case).await?.unwrap_or_default();

        let mut ids: HashSet<String> = items.iter().map(|item| item.id.clone()).collect();
        for item in &new_items {
            if !ids.insert(item.id.clone()) {
                return Err(CuratorError::invalid_argument(format!("Item with ID {} already exists", item.id)));
            }
        }

        items.extend(new_items);
        self.write_items(case, &items).await
    }
}

#[async_trait]
impl ItemStore for JsonItemStore {
    async fn load(&self, case: &CaseName) -> CuratorResult<Option<Vec<DashboardItem>>> {
        let _guard = self.locks.lock(case).await;
        self.read_items(case).await
    }

    async fn list(&self, case: &CaseName) -> CuratorResult<Vec<DashboardItem>> {
        Ok(self.load(case).await?.unwrap_or_default())
    }

    async fn insert(&self, case: &CaseName, item: DashboardItem) -> CuratorResult<()> {
        self.append(case, vec![item]).await
    }

    async fn append_batch(&self, case: &CaseName, items: Vec<DashboardItem>) -> CuratorResult<()> {
        self.append(case, items).await
    }

    async fn update(&self, case: &CaseName, item_id: &str, component: Component, reason: &str) -> CuratorResult<DashboardItem> {
        let _guard = self.locks.lock(case).await;
        let mut items = self.read_existing(case).await?;

        let item = items
            .iter_mut()
            .find(|item| item.id == item_id)
            .ok_or_else(|| CuratorError::ItemNotFound { item_id: item_id.to_string() })?;
        item.replace_component(component, reason);
        let updated = item.clone();

        self.write_items(case, &items).await?;
        Ok(updated)
    }

    async fn delete(&self, case: &CaseName, item_id: &str, reason: &str) -> CuratorResult<usize> {
        let _guard = self.locks.lock(case).await;
        let mut items = self.read_existing(case).await?;

        let before = items.len();
        items.retain(|item| item.id != item_id);
        if items.len() == before {
            return Err(CuratorError::ItemNotFound { item_id: item_id.to_string() });
        }

        self.write_items(case, &items).await?;
        service_debug!(ServiceId::current(), "🗑️ Deleted {} from '{}' ({})", item_id, case, reason);
        Ok(items.len())
    }

    async fn append_consolidated(
        &self,
        case: &CaseName,
        component: Component,
        source_item_ids: Vec<String>,
        reason: &str,
    ) -> CuratorResult<String> {
        let item = DashboardItem::consolidated(case, component, source_item_ids, reason);
        let id = item.id.clone();
        self.append(case, vec![item]).await?;
        Ok(id)
    }

    async fn deduplicate(&self, case: &CaseName) -> CuratorResult<Option<DedupOutcome>> {
        let _guard = self.locks.lock(case).await;
        let Some(items) = self.read_items(case).await? else {
            return Ok(None);
        };

        let outcome = deduplicate(items);
        if outcome.duplicates_removed > 0 {
            self.write_items(case, &outcome.items).await?;
        }
        Ok(Some(outcome))
    }

    async fn save_optimization_log(&self, case: &CaseName, log: OptimizationLog) -> CuratorResult<()> {
        let _guard = self.locks.lock(case).await;
        write_json(&self.log_path(case)?, &log).await
    }

    async fn load_optimization_log(&self, case: &CaseName) -> CuratorResult<Option<OptimizationLog>> {
        let _guard = self.locks.lock(case).await;
        read_json(&self.log_path(case)?).await
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> CuratorResult<Option<T>> {
    let content = match fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CuratorError::storage("read", path, e)),
    };

    serde_json::from_str(&content).map(Some).map_err(|e| CuratorError::CorruptDocument {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> CuratorResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| CuratorError::storage("create directory", parent, e))?;
    }

    let content = serde_json::to_string_pretty(value)
        .map_err(|e| CuratorError::storage("serialize", path, e))?;
    atomic_write(path, &content).await
}

/// Write to a sibling temp file, then rename over the target
async fn atomic_write(path: &Path, content: &str) -> CuratorResult<()> {
    let temp_path = path.with_extension("json.tmp");

    fs::write(&temp_path, content)
        .await
        .map_err(|e| CuratorError::storage("write temp file", &temp_path, e))?;

    fs::rename(&temp_path, path)
        .await
        .map_err(|e| CuratorError::storage("rename temp file", path, e))?;

    Ok(())
}
