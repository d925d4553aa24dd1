//! Ledger Engine Library
//! # Overview
//!
//! This library applies balance-changing operations (transfers, deposits,
//! withdrawals) to ledger accounts under bounded concurrency, keeping every
//! operation atomic and every committed change recorded in an append-only
//! ledger and audit trail.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Account, LedgerEntry, AuditEntry, errors)
//! - [`core`] - Business logic components:
//!   - [`core::traits`] - Storage abstractions and the [`core::Stores`] bundle
//!   - [`core::gate`] - Admission gate capping concurrent mutating operations
//!   - [`core::locks`] - Per-account locks taken for every read-validate-commit
//!   - [`core::scope`] - All-or-nothing commit of balances, ledger and audit
//!   - [`core::processor`] - Transfer, deposit and withdrawal orchestration
//!   - [`core::batch`] - Concurrent, per-request-atomic batch execution
//!   - [`core::account_service`] - Account creation, lookup and deactivation
//! - [`bank`] - Wires the components above over one set of stores
//! - [`io`] - CSV reading and account output
//! - [`runner`] / [`cli`] / [`config`] - Command-line batch runner
//!
//! # Guarantees
//!
//! - A failed operation leaves no balance change, ledger entry or audit entry
//! - Concurrent operations on the same account never lose updates
//! - A transfer preserves the sum of the two balances involved
//! - A batch is atomic per request only, never across the whole batch

// Module declarations
pub mod bank;
pub mod cli;
pub mod config;
pub mod core;
pub mod io;
pub mod runner;
pub mod types;

pub use bank::Bank;
pub use config::EngineConfig;
pub use core::{AccountService, BatchProcessor, ConcurrencyGate, TransactionProcessor};
pub use io::write_accounts_csv;
pub use types::{
    Account, AccountId, BalanceView, LedgerEntry, LedgerError, StoreError, TransactionRequest,
    TransactionResult, TransactionType,
};
