//! Ledger Engine CLI
//!
//! Command-line interface for applying transfers, deposits and withdrawals
//! from a CSV file to a set of ledger accounts.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- requests.csv > accounts.csv
//! cargo run -- --accounts opening.csv requests.csv > accounts.csv
//! cargo run -- --accounts opening.csv --gate-capacity 8 --batch-size 500 requests.csv
//! RUST_LOG=ledger_engine=debug cargo run -- --accounts opening.csv requests.csv
//! ```
//!
//! Final account states go to stdout as CSV; logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success (individual requests may still have failed; see the logs)
//! - 1: Fatal error (missing file, malformed accounts file, batch timeout, etc.)

use ledger_engine::cli;
use ledger_engine::runner::Runner;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ledger_engine=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();
    let runner = Runner::new(args.to_engine_config());

    let mut output = std::io::stdout();
    if let Err(e) = runner.run(&args.requests_file, args.accounts_file.as_deref(), &mut output) {
        tracing::error!(error = %e, "Run aborted");
        process::exit(1);
    }
}
