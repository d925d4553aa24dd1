use crate::config::EngineConfig;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Apply transfers, deposits and withdrawals to a set of ledger accounts
#[derive(Parser, Debug)]
#[command(name = "ledger-engine")]
#[command(about = "Apply transfers, deposits and withdrawals to ledger accounts", long_about = None)]
pub struct CliArgs {
    /// Requests CSV file (type,from,to,amount,description)
    #[arg(value_name = "REQUESTS", help = "Path to the requests CSV file")]
    pub requests_file: PathBuf,

    /// Accounts to open before processing (type,opening_balance)
    #[arg(
        long = "accounts",
        value_name = "FILE",
        help = "CSV of accounts to open first; ids are assigned 1..n in file order"
    )]
    pub accounts_file: Option<PathBuf>,

    #[arg(
        long = "gate-capacity",
        value_name = "COUNT",
        help = "Maximum concurrent balance-changing operations (default: 5)"
    )]
    pub gate_capacity: Option<usize>,

    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of requests per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    #[arg(
        long = "workers",
        value_name = "COUNT",
        help = "Runtime worker threads (default: CPU cores)"
    )]
    pub workers: Option<usize>,

    #[arg(
        long = "batch-timeout-ms",
        value_name = "MILLIS",
        help = "Give up waiting for a batch after this many milliseconds"
    )]
    pub batch_timeout_ms: Option<u64>,
}

impl CliArgs {
    /// Build the EngineConfig, using defaults for anything not given
    pub fn to_engine_config(&self) -> EngineConfig {
        let default = EngineConfig::default();
        let config = EngineConfig::new(
            self.gate_capacity.unwrap_or(default.gate_capacity),
            self.batch_size.unwrap_or(default.batch_size),
            self.workers.unwrap_or(default.worker_threads),
        );

        match self.batch_timeout_ms {
            Some(millis) => config.with_batch_timeout(Duration::from_millis(millis)),
            None => config,
        }
    }
}
