use std::sync::Arc;

use dashmap::DashMap;
use log::*;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockTable = Arc<DashMap<String, Arc<Mutex<()>>>>;

/// A set of async mutexes, one per payment address.
///
/// Callback and push signals for the same address must not interleave their read-modify-write cycles, or the slower
/// one silently overwrites the faster. Holding the guard returned by [`AddressLocks::lock`] across the cycle rules
/// that out, while signals for different addresses still run in parallel.
///
/// An address only has an entry while someone holds or waits for its lock, so signals for unknown addresses do not
/// grow the table. Clones share the same lock table.
#[derive(Debug, Clone, Default)]
pub struct AddressLocks {
    locks: LockTable,
}

impl AddressLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no one else holds the lock for `address`, and returns the guard.
    pub async fn lock(&self, address: &str) -> AddressGuard {
        // The map shard must be released before awaiting, so clone the mutex out of the entry first.
        let mutex = self.locks.entry(address.to_string()).or_default().clone();
        trace!("🔐️ Acquiring lock for [{address}]");
        let guard = mutex.lock_owned().await;
        AddressGuard { guard: Some(guard), address: address.to_string(), locks: Arc::clone(&self.locks) }
    }

    /// The number of addresses that are currently locked or waited on.
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Holds the lock for one address. Dropping it releases the lock, and removes the address from the table if no other
/// task is holding or waiting for it.
pub struct AddressGuard {
    guard: Option<OwnedMutexGuard<()>>,
    address: String,
    locks: LockTable,
}

impl Drop for AddressGuard {
    fn drop(&mut self) {
        // Release the mutex first, so that the table holds the last reference when no one else wants it.
        drop(self.guard.take());
        // `remove_if` holds the shard lock, so no other task can clone the mutex out of the entry while we check.
        if self.locks.remove_if(&self.address, |_, m| Arc::strong_count(m) == 1).is_some() {
            trace!("🔐️ Released the last lock for [{}]", self.address);
        }
    }
}
