//! Storage traits the transaction processor is written against
//!
//! The durable storage engine is an external collaborator. These traits name
//! the primitives the core needs from it: keyed reads and writes for accounts
//! and append-only writes for ledger and audit records. `AccountStore::remove`
//! and `LedgerStore::retract` exist only to undo a write that is rolling back.
//!
//! The in-memory implementations in this crate use `DashMap`; any backend that
//! is `Send + Sync` can be plugged in.

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::types::{
    Account, AccountId, AuditDraft, AuditEntry, EntryId, LedgerDraft, LedgerEntry,
    StoreError,
};

/// Keyed access to account records
pub trait AccountStore: Send + Sync {
    /// Create an account with a fresh id and unique number
    fn create(&self, account_type: &str) -> Result<Account, StoreError>;

    /// Get an account by id, active or not
    fn get(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    /// Get an account by its unique number, active or not
    fn get_by_number(&self, number: &str) -> Result<Option<Account>, StoreError>;

    /// All accounts ordered by id
    fn list(&self) -> Result<Vec<Account>, StoreError>;

    /// Overwrite an account's balance
    fn set_balance(&self, id: AccountId, balance: Decimal) -> Result<(), StoreError>;

    /// Set the active flag, returning the previous value
    fn set_active(&self, id: AccountId, active: bool) -> Result<bool, StoreError>;

    /// Remove an account whose creation is rolling back
    fn remove(&self, id: AccountId) -> Result<(), StoreError>;
}

/// Append-only access to ledger entries
pub trait LedgerStore: Send + Sync {
    /// Persist a draft, assigning id, timestamp and `Completed` status
    fn append(&self, draft: LedgerDraft) -> Result<LedgerEntry, StoreError>;

    /// Remove an entry appended by a scope that is rolling back
    fn retract(&self, id: EntryId) -> Result<(), StoreError>;

    fn get(&self, id: EntryId) -> Result<Option<LedgerEntry>, StoreError>;

    /// Entries where the account is source or destination, most recent first
    fn by_account(&self, account: AccountId) -> Result<Vec<LedgerEntry>, StoreError>;

    /// Every entry, most recent first
    fn all(&self) -> Result<Vec<LedgerEntry>, StoreError>;
}

/// Append-only audit trail
pub trait AuditSink: Send + Sync {
    fn append(&self, draft: AuditDraft) -> Result<AuditEntry, StoreError>;

    /// Every entry, oldest first
    fn entries(&self) -> Result<Vec<AuditEntry>, StoreError>;

    /// Up to `limit` entries, newest first
    fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, StoreError>;
}

/// The set of backends one processor and account service operate on
#[derive(Clone)]
pub struct Stores {
    pub accounts: Arc<dyn AccountStore>,
    pub ledger: Arc<dyn LedgerStore>,
    pub audit: Arc<dyn AuditSink>,
}

impl Stores {
    pub fn new(
        accounts: Arc<dyn AccountStore>,
        ledger: Arc<dyn LedgerStore>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            accounts,
            ledger,
            audit,
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}
