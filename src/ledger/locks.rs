use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::ProductId;

/// Lazily populated table of one async lock per product.
///
/// The table mutex is only held long enough to look up or insert an entry;
/// the per-product lock is what callers wait on.
#[derive(Debug, Default)]
pub struct ProductLocks {
    table: Mutex<HashMap<ProductId, Arc<Mutex<()>>>>,
}

impl ProductLocks {
    pub async fn acquire(&self, id: ProductId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut table = self.table.lock().await;
            Arc::clone(table.entry(id).or_default())
        };
        lock.lock_owned().await
    }

    /// Drop the entry for a deleted product.
    ///
    /// Ids are never reused, so anyone still queued on the old lock can only
    /// observe `NotFound`.
    pub async fn forget(&self, id: ProductId) {
        self.table.lock().await.remove(&id);
    }

    /// Drop the entry for `id` if `guard` is the only handle left on it.
    ///
    /// Handles are only cloned out of the table while its mutex is held, so
    /// a strong count of two (table plus `guard`) means nobody is queued.
    pub async fn release_if_idle(&self, id: ProductId, guard: OwnedMutexGuard<()>) {
        let mut table = self.table.lock().await;
        let idle = table.get(&id).is_some_and(|lock| {
            Arc::ptr_eq(lock, OwnedMutexGuard::mutex(&guard)) && Arc::strong_count(lock) == 2
        });
        if idle {
            table.remove(&id);
        }
        drop(guard);
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.table.lock().await.len()
    }
}
