//! Per-sender serialization of the read-modify-write cycle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

type LockMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// Keyed async mutex: one lock per sender id.
///
/// Entries are created on demand and removed when the last holder or waiter
/// releases them.
#[derive(Debug, Default)]
pub struct SenderLocks {
    locks: Mutex<LockMap>,
}

impl SenderLocks {
    /// Create an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, LockMap> {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Wait for exclusive access to `key`.
    pub async fn acquire(&self, key: &str) -> SenderGuard<'_> {
        let lock = self
            .table()
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone();

        let guard = lock.lock_owned().await;

        SenderGuard {
            locks: self,
            key: key.to_string(),
            guard: Some(guard),
        }
    }

    /// Number of keys currently held or awaited.
    pub fn len(&self) -> usize {
        self.table().len()
    }

    /// Whether no key is held or awaited.
    pub fn is_empty(&self) -> bool {
        self.table().is_empty()
    }
}

/// Exclusive access to one sender; released on drop.
#[derive(Debug)]
pub struct SenderGuard<'a> {
    locks: &'a SenderLocks,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SenderGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();

        let mut table = self.locks.table();
        let idle = table
            .get(&self.key)
            .is_some_and(|lock| Arc::strong_count(lock) == 1);
        if idle {
            table.remove(&self.key);
        }
    }
}
