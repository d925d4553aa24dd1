//! Bounded admission control for mutating operations
//!
//! The `ConcurrencyGate` caps how many balance-changing operations run at the
//! same time. It is a throttle, not a correctness mechanism: two admitted
//! operations may still target the same account, which is why the processor
//! also takes per-account locks (see `locks`).
//!
//! # Fairness
//!
//! The gate is a `tokio::sync::Semaphore`, which queues waiters in FIFO order.
//! A waiting operation is therefore admitted after at most the operations that
//! queued before it, so no caller starves under bounded load.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Default number of concurrently admitted operations
pub const DEFAULT_GATE_CAPACITY: usize = 5;

/// Global admission gate shared by all operations of one processor
#[derive(Debug, Clone)]
pub struct ConcurrencyGate {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// A held admission slot
///
/// The slot is returned when the permit is dropped, including on early return
/// or panic of the operation holding it.
#[derive(Debug)]
pub struct GatePermit {
    _permit: OwnedSemaphorePermit,
}

impl ConcurrencyGate {
    /// Create a gate admitting at most `capacity` operations (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a free slot
    pub async fn acquire(&self) -> GatePermit {
        // The semaphore is never closed, so acquisition only fails if that changes
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .unwrap_or_else(|_| unreachable!("concurrency gate semaphore closed"));
        GatePermit { _permit: permit }
    }

    #[cfg(test)]
    fn try_acquire(&self) -> Option<GatePermit> {
        Arc::clone(&self.semaphore)
            .try_acquire_owned()
            .ok()
            .map(|permit| GatePermit { _permit: permit })
    }

    /// Return a slot explicitly. Equivalent to dropping the permit.
    pub fn release(&self, permit: GatePermit) {
        drop(permit);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots currently free
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Slots currently held
    pub fn in_flight(&self) -> usize {
        self.capacity - self.available()
    }
}

impl Default for ConcurrencyGate {
    fn default() -> Self {
        Self::new(DEFAULT_GATE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[test]
    fn test_default_capacity_is_five() {
        let gate = ConcurrencyGate::default();
        assert_eq!(gate.capacity(), 5);
        assert_eq!(gate.available(), 5);
        assert_eq!(gate.in_flight(), 0);
    }

    #[test]
    fn test_zero_capacity_is_clamped_to_one() {
        let gate = ConcurrencyGate::new(0);
        assert_eq!(gate.capacity(), 1);
    }

    #[tokio::test]
    async fn test_acquire_and_release() {
        let gate = ConcurrencyGate::new(2);

        let first = gate.acquire().await;
        let second = gate.acquire().await;
        assert_eq!(gate.in_flight(), 2);
        assert!(gate.try_acquire().is_none());

        gate.release(first);
        assert_eq!(gate.available(), 1);

        drop(second);
        assert_eq!(gate.available(), 2);
    }

    #[tokio::test]
    async fn test_clones_share_capacity() {
        let gate = ConcurrencyGate::new(1);
        let clone = gate.clone();

        let _permit = gate.acquire().await;
        assert!(clone.try_acquire().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_never_exceeds_capacity() {
        let gate = ConcurrencyGate::new(3);
        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..30 {
            let gate = gate.clone();
            let current = Arc::clone(&current);
            let peak = Arc::clone(&peak);
            tasks.push(tokio::spawn(async move {
                let _permit = gate.acquire().await;
                let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(2)).await;
                current.fetch_sub(1, Ordering::SeqCst);
            }));
        }

        for task in tasks {
            task.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(gate.available(), 3);
    }

    #[tokio::test]
    async fn test_waiter_is_admitted_after_release() {
        let gate = ConcurrencyGate::new(1);
        let held = gate.acquire().await;

        let waiter = {
            let gate = gate.clone();
            tokio::spawn(async move {
                let _permit = gate.acquire().await;
            })
        };

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(!waiter.is_finished());

        drop(held);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should be admitted")
            .unwrap();
    }
}
