//! Per-module mutation locks
//!
//! At most one mutation per module id is in flight at a time. Mutations on
//! different ids do not wait on each other. An id's entry lives only while
//! some task holds or waits for it.

use crate::domain::ModuleId;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockTable = DashMap<ModuleId, Arc<Mutex<()>>>;

/// Async lock table keyed by module id
#[derive(Debug, Default)]
pub struct ModuleLocks {
    locks: Arc<LockTable>,
}

impl ModuleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `id`
    ///
    /// The returned guard releases the lock when dropped.
    pub async fn acquire(&self, id: ModuleId) -> ModuleGuard {
        let lock = self.locks.entry(id).or_default().clone();
        let guard = lock.lock_owned().await;
        ModuleGuard {
            id,
            table: Arc::clone(&self.locks),
            guard: Some(guard),
        }
    }

    /// Number of ids currently held or waited on
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Exclusive access to one module id
#[derive(Debug)]
pub struct ModuleGuard {
    id: ModuleId,
    table: Arc<LockTable>,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ModuleGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the table's own reference left: nobody holds or waits
        self.table
            .remove_if(&self.id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
