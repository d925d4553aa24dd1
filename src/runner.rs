//! Batch runner driving a requests file through the ledger
//!
//! # Architecture
//!
//! ```text
//! Runner
//!     ├── EngineConfig (gate capacity, batch size, workers, batch timeout)
//!     ├── AccountsReader (opening accounts, sync)
//!     ├── AsyncReader (request batches, csv-async)
//!     └── Bank
//!         ├── AccountService
//!         ├── TransactionProcessor
//!         └── BatchProcessor
//! ```
//!
//! Batches are processed one after another; requests inside a batch run
//! concurrently. A request's failure is logged and counted, never fatal.

use crate::bank::Bank;
use crate::config::EngineConfig;
use crate::io::accounts_reader::AccountsReader;
use crate::io::async_reader::AsyncReader;
use crate::io::csv_format::write_accounts_csv;
use std::io::Write;
use std::path::Path;
use tracing::{info, warn};

/// Counters reported after a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub accounts_opened: usize,
    pub batches: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Request rows that could not be parsed
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct Runner {
    config: EngineConfig,
}

impl Runner {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Process a requests file and write the final account states to `output`
    ///
    /// This method:
    /// 1. Creates a multi-threaded tokio runtime with the configured workers
    /// 2. Opens the accounts listed in `accounts_path` (ids 1..n in file order)
    ///    and funds their opening balances through deposits
    /// 3. Reads requests in batches and processes each batch concurrently,
    ///    waiting for a batch to finish before reading the next one
    /// 4. Writes every account, active or not, to `output`
    ///
    /// # Returns
    ///
    /// * `Ok(RunSummary)` if processing completed (individual requests may
    ///   still have failed)
    /// * `Err(String)` on a fatal error: unreadable file, bad accounts row,
    ///   storage fault while opening accounts, batch timeout, output failure
    pub fn run(
        &self,
        requests_path: &Path,
        accounts_path: Option<&Path>,
        output: &mut dyn Write,
    ) -> Result<RunSummary, String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.worker_threads)
            .enable_all()
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let bank = Bank::in_memory(&self.config);
            let mut summary = RunSummary::default();

            if let Some(path) = accounts_path {
                summary.accounts_opened = open_accounts(&bank, path).await?;
            }

            let file = tokio::fs::File::open(requests_path).await.map_err(|e| {
                format!("Failed to open file '{}': {}", requests_path.display(), e)
            })?;

            // Wrap tokio file in a compatibility layer for csv-async
            let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
            let mut reader = AsyncReader::new(compat_file);

            loop {
                let batch = reader.read_batch(self.config.batch_size).await;
                if batch.is_empty() {
                    break;
                }
                summary.batches += 1;

                let results = match self.config.batch_timeout {
                    Some(timeout) => bank
                        .process_batch_results_with_timeout(batch, timeout)
                        .await
                        .map_err(|e| e.to_string())?,
                    None => bank.process_batch_results(batch).await,
                };

                for processed in results {
                    if processed.result.success {
                        summary.succeeded += 1;
                    } else {
                        summary.failed += 1;
                        warn!(
                            tx_type = %processed.request.transaction_type,
                            from = ?processed.request.from_account,
                            to = ?processed.request.to_account,
                            amount = %processed.request.amount,
                            reason = %processed.result.message,
                            "Request failed"
                        );
                    }
                }
            }
            summary.skipped = reader.skipped();

            let accounts = bank
                .stores()
                .accounts
                .list()
                .map_err(|e| format!("Failed to read accounts: {}", e))?;
            write_accounts_csv(&accounts, output)?;

            info!(
                accounts = summary.accounts_opened,
                batches = summary.batches,
                succeeded = summary.succeeded,
                failed = summary.failed,
                skipped = summary.skipped,
                "Run complete"
            );
            Ok(summary)
        })
    }
}

async fn open_accounts(bank: &Bank, path: &Path) -> Result<usize, String> {
    let mut opened = 0;

    for row in AccountsReader::new(path)? {
        let opening = row?;
        let account = bank
            .accounts()
            .create_account(&opening.account_type)
            .map_err(|e| format!("Failed to open account: {}", e))?;

        if opening.opening_balance > rust_decimal::Decimal::ZERO {
            let result = bank
                .process_deposit(account.id, opening.opening_balance, Some("Opening balance"))
                .await;
            if !result.success {
                return Err(format!(
                    "Failed to fund account {}: {}",
                    account.number, result.message
                ));
            }
        }
        opened += 1;
    }

    info!(accounts = opened, "Opened accounts");
    Ok(opened)
}
