//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account records and balance views
//! - `transaction`: Ledger entries, requests and results
//! - `audit`: Audit trail records
//! - `error`: Error types for the ledger engine

pub mod account;
pub mod audit;
pub mod error;
pub mod transaction;

pub use account::{Account, AccountId, BalanceView};
pub use audit::{AuditDraft, AuditEntry, AuditId, AuditOperation, AuditTable};
pub use error::{ErrorKind, LedgerError, StoreError};
pub use transaction::{
    EntryId, LedgerDraft, LedgerEntry, TransactionRequest, TransactionResult, TransactionStatus,
    TransactionType,
};
