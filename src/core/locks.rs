//! Per-account mutual exclusion
//!
//! Every operation that reads a balance and then writes it holds the lock of
//! each account involved for the whole read-validate-commit sequence. This is
//! what prevents lost updates between admitted operations; the concurrency gate
//! alone does not.
//!
//! Locks are async mutexes so a waiting operation yields its worker thread.
//! Pairs are always taken in ascending id order, so two transfers running in
//! opposite directions between the same accounts cannot deadlock.
//!
//! A lock exists in the registry only while some operation holds or waits for
//! it. The last guard to let go of an account removes its entry, so the
//! registry never outgrows the number of in-flight operations.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::types::AccountId;

type Registry = DashMap<AccountId, Arc<Mutex<()>>>;

/// Registry of per-account locks, created on first use
#[derive(Debug, Default)]
pub struct AccountLocks {
    locks: Arc<Registry>,
}

/// Held locks for one or two accounts, released on drop
#[derive(Debug)]
pub struct AccountGuard {
    guards: Vec<(AccountId, OwnedMutexGuard<()>)>,
    registry: Arc<Registry>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self {
            locks: Arc::new(DashMap::new()),
        }
    }

    fn handle(&self, id: AccountId) -> Arc<Mutex<()>> {
        // Clone the Arc so no shard lock is held while awaiting the mutex
        Arc::clone(self.locks.entry(id).or_default().value())
    }

    /// Lock a single account
    pub async fn lock(&self, id: AccountId) -> AccountGuard {
        let guard = self.handle(id).lock_owned().await;
        AccountGuard {
            guards: vec![(id, guard)],
            registry: Arc::clone(&self.locks),
        }
    }

    /// Lock two accounts in ascending id order
    ///
    /// Locking the same id twice would deadlock, so equal ids take one lock.
    pub async fn lock_pair(&self, a: AccountId, b: AccountId) -> AccountGuard {
        if a == b {
            return self.lock(a).await;
        }

        let (first, second) = if a < b { (a, b) } else { (b, a) };
        let first_guard = self.handle(first).lock_owned().await;
        let second_guard = self.handle(second).lock_owned().await;
        AccountGuard {
            guards: vec![(first, first_guard), (second, second_guard)],
            registry: Arc::clone(&self.locks),
        }
    }

    /// Number of accounts with a lock currently registered
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }

    #[cfg(test)]
    fn is_locked(&self, id: AccountId) -> bool {
        self.locks
            .get(&id)
            .map(|lock| lock.try_lock().is_err())
            .unwrap_or(false)
    }
}

impl Drop for AccountGuard {
    fn drop(&mut self) {
        for (id, guard) in self.guards.drain(..).rev() {
            drop(guard);
            // Only the registry's own handle left: nobody holds or waits for it.
            // `handle` clones under the same shard lock, so this cannot race a new waiter.
            self.registry
                .remove_if(&id, |_, lock| Arc::strong_count(lock) == 1);
        }
    }
}
