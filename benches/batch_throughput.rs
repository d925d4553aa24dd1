//! Benchmark suite for batch throughput
//!
//! Measures how fast batches of mixed requests go through the engine as the
//! gate capacity and the degree of account contention vary.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use ledger_engine::types::TransactionRequest;
use ledger_engine::{Bank, EngineConfig};
use rust_decimal::Decimal;

fn main() {
    divan::main();
}

const BATCH: u32 = 1_000;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .build()
        .expect("Failed to create tokio runtime")
}

/// Bank with `accounts` accounts holding 1,000,000 each
fn bank(runtime: &tokio::runtime::Runtime, gate_capacity: usize, accounts: u32) -> Bank {
    let bank = Bank::in_memory(&EngineConfig::new(gate_capacity, BATCH as usize, 4));
    runtime.block_on(async {
        for _ in 0..accounts {
            let account = bank.accounts().create_account("Checking").unwrap();
            bank.process_deposit(account.id, Decimal::new(1_000_000, 0), None)
                .await;
        }
    });
    bank
}

/// Transfers, deposits and withdrawals spread over `accounts` accounts
fn requests(accounts: u32) -> Vec<TransactionRequest> {
    (0..BATCH)
        .map(|i| {
            let a = i % accounts + 1;
            let b = (i + 1) % accounts + 1;
            match i % 3 {
                0 => TransactionRequest::transfer(a, b, Decimal::new(5, 0)),
                1 => TransactionRequest::deposit(a, Decimal::new(3, 0)),
                _ => TransactionRequest::withdrawal(b, Decimal::new(2, 0)),
            }
        })
        .collect()
}

/// Many accounts, little lock contention
#[divan::bench(args = [1, 5, 16])]
fn spread_accounts(bencher: divan::Bencher, gate_capacity: usize) {
    let runtime = runtime();
    let bank = bank(&runtime, gate_capacity, 100);

    bencher
        .with_inputs(|| requests(100))
        .bench_local_values(|batch| runtime.block_on(bank.process_batch(batch)));
}

/// Two accounts, every request contends for the same locks
#[divan::bench(args = [1, 5, 16])]
fn hot_accounts(bencher: divan::Bencher, gate_capacity: usize) {
    let runtime = runtime();
    let bank = bank(&runtime, gate_capacity, 2);

    bencher
        .with_inputs(|| requests(2))
        .bench_local_values(|batch| runtime.block_on(bank.process_batch(batch)));
}
