//! Fault-injecting store wrappers for unit tests

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use rust_decimal::Decimal;

use super::traits::{AccountStore, AuditSink, LedgerStore, Stores};
use super::{InMemoryAccountStore, InMemoryAuditLog, InMemoryLedgerStore};
use crate::types::{
    Account, AccountId, AuditDraft, AuditEntry, EntryId, LedgerDraft, LedgerEntry,
    StoreError,
};

pub(crate) fn in_memory_stores() -> Stores {
    Stores::new(
        Arc::new(InMemoryAccountStore::new()),
        Arc::new(InMemoryLedgerStore::new()),
        Arc::new(InMemoryAuditLog::new()),
    )
}

/// Account store that rejects balance writes for one chosen account
pub(crate) struct FailingAccountStore {
    inner: InMemoryAccountStore,
    /// 0 means no account is rejected
    rejected: AtomicU32,
}

impl FailingAccountStore {
    pub(crate) fn new() -> Self {
        Self {
            inner: InMemoryAccountStore::new(),
            rejected: AtomicU32::new(0),
        }
    }

    pub(crate) fn reject_writes_for(&self, id: AccountId) {
        self.rejected.store(id, Ordering::SeqCst);
    }
}

impl AccountStore for FailingAccountStore {
    fn create(&self, account_type: &str) -> Result<Account, StoreError> {
        self.inner.create(account_type)
    }

    fn get(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        self.inner.get(id)
    }

    fn get_by_number(&self, number: &str) -> Result<Option<Account>, StoreError> {
        self.inner.get_by_number(number)
    }

    fn list(&self) -> Result<Vec<Account>, StoreError> {
        self.inner.list()
    }

    fn set_balance(&self, id: AccountId, balance: Decimal) -> Result<(), StoreError> {
        if self.rejected.load(Ordering::SeqCst) == id {
            return Err(StoreError::unavailable("account write rejected"));
        }
        self.inner.set_balance(id, balance)
    }

    fn set_active(&self, id: AccountId, active: bool) -> Result<bool, StoreError> {
        self.inner.set_active(id, active)
    }

    fn remove(&self, id: AccountId) -> Result<(), StoreError> {
        self.inner.remove(id)
    }
}

/// Ledger store whose appends always fail
pub(crate) struct FailingLedgerStore {
    inner: InMemoryLedgerStore,
}

impl FailingLedgerStore {
    pub(crate) fn new() -> Self {
        Self {
            inner: InMemoryLedgerStore::new(),
        }
    }
}

impl LedgerStore for FailingLedgerStore {
    fn append(&self, _draft: LedgerDraft) -> Result<LedgerEntry, StoreError> {
        Err(StoreError::unavailable("ledger append rejected"))
    }

    fn retract(&self, id: EntryId) -> Result<(), StoreError> {
        self.inner.retract(id)
    }

    fn get(&self, id: EntryId) -> Result<Option<LedgerEntry>, StoreError> {
        self.inner.get(id)
    }

    fn by_account(&self, account: AccountId) -> Result<Vec<LedgerEntry>, StoreError> {
        self.inner.by_account(account)
    }

    fn all(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        self.inner.all()
    }
}

/// Audit sink whose appends always fail
pub(crate) struct FailingAuditSink {
    inner: InMemoryAuditLog,
}

impl FailingAuditSink {
    pub(crate) fn new() -> Self {
        Self {
            inner: InMemoryAuditLog::new(),
        }
    }
}

impl AuditSink for FailingAuditSink {
    fn append(&self, _draft: AuditDraft) -> Result<AuditEntry, StoreError> {
        Err(StoreError::unavailable("audit append rejected"))
    }

    fn entries(&self) -> Result<Vec<AuditEntry>, StoreError> {
        self.inner.entries()
    }

    fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, StoreError> {
        self.inner.recent(limit)
    }
}
