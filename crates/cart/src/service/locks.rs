use shared::errors::ServiceError;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::warn;

type LockTable = Arc<Mutex<HashMap<i32, Arc<AsyncMutex<()>>>>>;

/// Per-owner mutual exclusion for cart mutations within this process.
#[derive(Clone)]
pub struct OwnerLocks {
    table: LockTable,
    timeout: Duration,
}

/// Held for the duration of one mutation. The owner's entry is pruned on
/// drop once nobody else holds or waits for it.
pub struct OwnerGuard {
    owner_id: i32,
    guard: Option<OwnedMutexGuard<()>>,
    table: LockTable,
}

impl OwnerLocks {
    pub fn new(timeout: Duration) -> Self {
        Self {
            table: Arc::new(Mutex::new(HashMap::new())),
            timeout,
        }
    }

    pub async fn acquire(&self, owner_id: i32) -> Result<OwnerGuard, ServiceError> {
        let lock = {
            let mut table = self
                .table
                .lock()
                .map_err(|_| ServiceError::Internal("owner lock table poisoned".into()))?;
            table.entry(owner_id).or_default().clone()
        };

        let guard = match tokio::time::timeout(self.timeout, lock.lock_owned()).await {
            Ok(guard) => guard,
            Err(_) => {
                warn!("⏳ Timed out waiting for cart lock of owner {owner_id}");
                prune(&self.table, owner_id);
                return Err(ServiceError::ConcurrentModification);
            }
        };

        Ok(OwnerGuard {
            owner_id,
            guard: Some(guard),
            table: self.table.clone(),
        })
    }

    /// Number of owners with a live lock entry.
    pub fn len(&self) -> usize {
        self.table.lock().map(|t| t.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Removes the owner's entry once the table holds the only reference.
fn prune(table: &LockTable, owner_id: i32) {
    if let Ok(mut table) = table.lock()
        && table
            .get(&owner_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
    {
        table.remove(&owner_id);
    }
}

impl Drop for OwnerGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        prune(&self.table, self.owner_id);
    }
}
