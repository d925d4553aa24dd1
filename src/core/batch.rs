//! Concurrent execution of request batches
//!
//! This module provides the `BatchProcessor` struct, which dispatches every
//! request of a batch as its own tokio task and waits for all of them.
//!
//! # Design
//!
//! Each request is independently admitted through the concurrency gate and
//! independently atomic. A batch is **not** all-or-nothing: one failed request
//! never reverts the others, and the batch only reports overall success when
//! every request succeeded.
//!
//! Ordering between requests of one batch is not guaranteed. Requests that
//! touch the same account are serialised by the account locks in whatever
//! order they win them.
//!
//! # Architecture
//!
//! ```text
//! BatchProcessor
//!     └── TransactionProcessor  (cloned into every spawned task)
//! ```

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, error};

use super::processor::TransactionProcessor;
use crate::types::{LedgerError, TransactionRequest, TransactionResult};

/// Result of processing a single request
///
/// Contains the original request and the structured result it produced.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
    /// The request that was processed
    pub request: TransactionRequest,

    /// The outcome (success or failure with message)
    pub result: TransactionResult,
}

/// Runs batches of typed requests concurrently
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    processor: TransactionProcessor,
}

impl BatchProcessor {
    /// Create a new BatchProcessor
    ///
    /// # Arguments
    ///
    /// * `processor` - Processor every request of a batch is dispatched to
    pub fn new(processor: TransactionProcessor) -> Self {
        Self { processor }
    }

    pub fn processor(&self) -> &TransactionProcessor {
        &self.processor
    }

    /// Process a batch and return one result per request, in input order
    ///
    /// This method:
    /// 1. Spawns a tokio task per request
    /// 2. Waits for all tasks to complete
    /// 3. Pairs each request with its result
    ///
    /// # Guarantees
    ///
    /// - Every request yields exactly one result, even if its task panicked
    /// - Results are in the same order as the input requests
    /// - A failed request does not stop or revert the others
    pub async fn process_batch_results(
        &self,
        requests: Vec<TransactionRequest>,
    ) -> Vec<ProcessingResult> {
        let tasks = self.spawn_all(requests);
        collect(tasks).await
    }

    /// Process a batch, returning `true` only if every request succeeded
    ///
    /// An empty batch succeeds.
    pub async fn process_batch(&self, requests: Vec<TransactionRequest>) -> bool {
        let results = self.process_batch_results(requests).await;
        all_succeeded(&results)
    }

    /// Like [`process_batch`](Self::process_batch) with a bound on the wait
    ///
    /// When `timeout` elapses the caller gets `LedgerError::BatchTimeout`.
    /// Requests already spawned are not aborted; each still runs to commit or
    /// rollback on its own.
    pub async fn process_batch_with_timeout(
        &self,
        requests: Vec<TransactionRequest>,
        timeout: Duration,
    ) -> Result<bool, LedgerError> {
        let results = self
            .process_batch_results_with_timeout(requests, timeout)
            .await?;
        Ok(all_succeeded(&results))
    }

    /// Like [`process_batch_results`](Self::process_batch_results) with a
    /// bound on the wait, under the same rules as
    /// [`process_batch_with_timeout`](Self::process_batch_with_timeout)
    pub async fn process_batch_results_with_timeout(
        &self,
        requests: Vec<TransactionRequest>,
        timeout: Duration,
    ) -> Result<Vec<ProcessingResult>, LedgerError> {
        let tasks = self.spawn_all(requests);
        tokio::time::timeout(timeout, collect(tasks))
            .await
            .map_err(|_| {
                error!(timeout_ms = timeout.as_millis() as u64, "Batch wait timed out");
                LedgerError::BatchTimeout {
                    millis: timeout.as_millis(),
                }
            })
    }

    fn spawn_all(
        &self,
        requests: Vec<TransactionRequest>,
    ) -> Vec<(TransactionRequest, JoinHandle<TransactionResult>)> {
        debug!(requests = requests.len(), "Dispatching batch");

        requests
            .into_iter()
            .map(|request| {
                let processor = self.processor.clone();
                let task_request = request.clone();
                let task = tokio::spawn(async move { processor.dispatch(&task_request).await });
                (request, task)
            })
            .collect()
    }
}

async fn collect(
    tasks: Vec<(TransactionRequest, JoinHandle<TransactionResult>)>,
) -> Vec<ProcessingResult> {
    let mut results = Vec::with_capacity(tasks.len());

    for (request, task) in tasks {
        let result = match task.await {
            Ok(result) => result,
            Err(join_error) => {
                error!(
                    tx_type = %request.transaction_type,
                    error = %join_error,
                    "Batch task panicked"
                );
                TransactionResult::failed(format!(
                    "{} failed due to system error",
                    request.transaction_type
                ))
            }
        };
        results.push(ProcessingResult { request, result });
    }

    results
}

fn all_succeeded(results: &[ProcessingResult]) -> bool {
    results.iter().all(|processed| processed.result.success)
}
