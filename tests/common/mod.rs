//! Shared helpers for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use ledger_engine::core::{
    InMemoryAccountStore, InMemoryAuditLog, InMemoryLedgerStore, LedgerStore, Stores,
};
use ledger_engine::types::{AccountId, EntryId, LedgerDraft, LedgerEntry, StoreError};
use ledger_engine::{Bank, EngineConfig};
use rust_decimal::Decimal;

/// In-memory bank with one Checking account per balance, ids 1..n
pub async fn funded_bank(balances: &[i64]) -> Bank {
    let bank = Bank::in_memory(&EngineConfig::default());
    fund(&bank, balances).await;
    bank
}

pub async fn fund(bank: &Bank, balances: &[i64]) {
    for opening in balances {
        let account = bank.accounts().create_account("Checking").unwrap();
        if *opening > 0 {
            let result = bank
                .process_deposit(account.id, Decimal::new(*opening, 0), None)
                .await;
            assert!(result.success, "funding failed: {}", result.message);
        }
    }
}

pub fn balance(bank: &Bank, id: AccountId) -> Decimal {
    bank.stores().accounts.get(id).unwrap().unwrap().balance
}

pub fn total(bank: &Bank) -> Decimal {
    bank.stores()
        .accounts
        .list()
        .unwrap()
        .iter()
        .map(|account| account.balance)
        .sum()
}

/// Ledger store that starts rejecting appends once armed
pub struct FlakyLedgerStore {
    inner: InMemoryLedgerStore,
    /// Appends left before failures start; `u64::MAX` means never
    remaining: AtomicU64,
}

impl FlakyLedgerStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryLedgerStore::new(),
            remaining: AtomicU64::new(u64::MAX),
        }
    }

    /// Fail every append after the next `successes` ones
    pub fn fail_after(&self, successes: u64) {
        self.remaining.store(successes, Ordering::SeqCst);
    }
}

impl LedgerStore for FlakyLedgerStore {
    fn append(&self, draft: LedgerDraft) -> Result<LedgerEntry, StoreError> {
        let allowed = self
            .remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| match left {
                0 => None,
                u64::MAX => Some(u64::MAX),
                left => Some(left - 1),
            })
            .is_ok();
        if !allowed {
            return Err(StoreError::unavailable("ledger offline"));
        }
        self.inner.append(draft)
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

/// Bank over a flaky ledger store, returned with a handle to arm it
pub fn bank_with_flaky_ledger() -> (Bank, Arc<FlakyLedgerStore>) {
    let ledger = Arc::new(FlakyLedgerStore::new());
    let stores = Stores::new(
        Arc::new(InMemoryAccountStore::new()),
        Arc::clone(&ledger) as Arc<dyn LedgerStore>,
        Arc::new(InMemoryAuditLog::new()),
    );
    (Bank::new(stores, 5), ledger)
}
