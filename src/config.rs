//! Engine configuration
//!
//! Controls the admission gate capacity, how many requests are read per batch,
//! the number of runtime worker threads, and an optional bound on how long the
//! runner waits for one batch.

use std::time::Duration;

use tracing::warn;

use crate::core::DEFAULT_GATE_CAPACITY;

/// Default number of requests per batch
pub const DEFAULT_BATCH_SIZE: usize = 1000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of mutating operations in flight
    pub gate_capacity: usize,
    /// Number of requests per batch
    pub batch_size: usize,
    /// Tokio worker threads
    pub worker_threads: usize,
    /// How long the runner waits for one batch; `None` waits indefinitely
    pub batch_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gate_capacity: DEFAULT_GATE_CAPACITY,
            batch_size: DEFAULT_BATCH_SIZE,
            worker_threads: num_cpus::get(),
            batch_timeout: None,
        }
    }
}

impl EngineConfig {
    /// Create an EngineConfig with custom values
    ///
    /// Zero values are invalid and fall back to the defaults with a warning.
    pub fn new(gate_capacity: usize, batch_size: usize, worker_threads: usize) -> Self {
        let default = Self::default();

        Self {
            gate_capacity: or_default("gate_capacity", gate_capacity, default.gate_capacity),
            batch_size: or_default("batch_size", batch_size, default.batch_size),
            worker_threads: or_default("worker_threads", worker_threads, default.worker_threads),
            batch_timeout: None,
        }
    }

    /// Bound the wait for each batch. A zero duration is ignored.
    pub fn with_batch_timeout(mut self, timeout: Duration) -> Self {
        if timeout.is_zero() {
            warn!("Invalid batch_timeout (0 ms), waiting without a bound");
            self.batch_timeout = None;
        } else {
            self.batch_timeout = Some(timeout);
        }
        self
    }
}

fn or_default(name: &str, value: usize, default: usize) -> usize {
    if value == 0 {
        warn!("Invalid {} ({}), using default ({})", name, value, default);
        default
    } else {
        value
    }
}
