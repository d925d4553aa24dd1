//! Core business logic module
//!
//! This module contains the transaction processing components:
//! - `traits` - Storage abstractions the processor is written against
//! - `account_store`, `ledger_store`, `audit_log` - DashMap-backed stores
//! - `gate` - Bound on the number of operations in flight
//! - `locks` - Per-account mutual exclusion
//! - `scope` - All-or-nothing commit of balances, ledger entry and audit record
//! - `processor` - Transfer, deposit and withdrawal orchestration
//! - `batch` - Concurrent execution of request batches
//! - `account_service` - Account lifecycle operations

pub mod account_service;
pub mod account_store;
pub mod audit_log;
pub mod batch;
pub mod gate;
pub mod ledger_store;
pub mod locks;
pub mod processor;
pub mod scope;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;

pub use account_service::AccountService;
pub use account_store::{account_number, InMemoryAccountStore};
pub use audit_log::InMemoryAuditLog;
pub use batch::{BatchProcessor, ProcessingResult};
pub use gate::{ConcurrencyGate, GatePermit, DEFAULT_GATE_CAPACITY};
pub use ledger_store::InMemoryLedgerStore;
pub use locks::{AccountGuard, AccountLocks};
pub use processor::TransactionProcessor;
pub use scope::AtomicScope;
pub use traits::{AccountStore, AuditSink, LedgerStore, Stores};
