//! Per-case mutual exclusion
//!
//! One async mutex per case name, created lazily. Holding the guard makes the
//! holder the single writer for that case.

use shared::CaseName;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Default)]
pub struct CaseLocks {
    locks: Mutex<HashMap<CaseName, Arc<Mutex<()>>>>,
}

impl CaseLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `case`
    pub async fn lock(&self, case: &CaseName) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.entry(case.clone()).or_insert_with(|| Arc::new(Mutex::new(()))).clone()
        };
        lock.lock_owned().await
    }
}
