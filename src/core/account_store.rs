//! Thread-safe in-memory account store
//!
//! This module provides the `InMemoryAccountStore` struct, which keeps account
//! records in concurrent data structures so they can be shared by every
//! in-flight operation.
//!
//! # Design
//!
//! Accounts live in a `DashMap` keyed by id. A second `DashMap` maps account
//! numbers to ids and acts as the unique secondary index. Ids and numbers come
//! from one atomic sequence, so both are unique by construction. Records
//! inserted from outside the sequence are checked against both keys.
//!
//! # Thread Safety
//!
//! Individual reads and writes are atomic per account through DashMap's shard
//! locks. Multi-step consistency (read balance, validate, write balance) is the
//! processor's job: it holds the per-account lock around those steps.

use std::sync::atomic::{AtomicU32, Ordering};

use dashmap::{DashMap, Entry};
use rust_decimal::Decimal;

use super::traits::AccountStore;
use crate::types::{Account, AccountId, StoreError};

/// Format an account number from its sequence value
pub fn account_number(sequence: u32) -> String {
    format!("ACC{:010}", sequence)
}

/// Thread-safe account store backed by `DashMap`
#[derive(Debug)]
pub struct InMemoryAccountStore {
    /// Account records by id
    accounts: DashMap<AccountId, Account>,

    /// Unique index on account number
    numbers: DashMap<String, AccountId>,

    /// Last assigned id
    sequence: AtomicU32,
}

impl InMemoryAccountStore {
    /// Create a new empty store. The first account gets id 1.
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            numbers: DashMap::new(),
            sequence: AtomicU32::new(0),
        }
    }

    /// Number of accounts held, active or not
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Insert a fully formed account record
    ///
    /// Fails if its number or its id is already taken; a rejected record
    /// leaves the store unchanged. Used by `create` and by callers restoring
    /// accounts from an external snapshot.
    pub fn insert(&self, account: Account) -> Result<(), StoreError> {
        let mut claimed = false;
        self.numbers
            .entry(account.number.clone())
            .or_insert_with(|| {
                claimed = true;
                account.id
            });

        if !claimed {
            return Err(StoreError::DuplicateAccountNumber {
                number: account.number,
            });
        }

        match self.accounts.entry(account.id) {
            Entry::Occupied(_) => {
                let id = account.id;
                self.numbers
                    .remove_if(&account.number, |_, owner| *owner == id);
                Err(StoreError::DuplicateAccountId { id })
            }
            Entry::Vacant(slot) => {
                self.sequence.fetch_max(account.id, Ordering::SeqCst);
                slot.insert(account);
                Ok(())
            }
        }
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn create(&self, account_type: &str) -> Result<Account, StoreError> {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let account = Account::new(id, account_number(id), account_type);
        self.insert(account.clone())?;
        Ok(account)
    }

    fn get(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.get(&id).map(|entry| entry.value().clone()))
    }

    fn get_by_number(&self, number: &str) -> Result<Option<Account>, StoreError> {
        // Copy the id out before touching the other map
        let id = self.numbers.get(number).map(|entry| *entry.value());
        match id {
            Some(id) => self.get(id),
            None => Ok(None),
        }
    }

    fn list(&self) -> Result<Vec<Account>, StoreError> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        accounts.sort_by_key(|account| account.id);
        Ok(accounts)
    }

    fn set_balance(&self, id: AccountId, balance: Decimal) -> Result<(), StoreError> {
        let mut entry = self
            .accounts
            .get_mut(&id)
            .ok_or(StoreError::AccountNotFound { id })?;
        entry.balance = balance;
        Ok(())
    }

    fn set_active(&self, id: AccountId, active: bool) -> Result<bool, StoreError> {
        let mut entry = self
            .accounts
            .get_mut(&id)
            .ok_or(StoreError::AccountNotFound { id })?;
        let previous = entry.active;
        entry.active = active;
        Ok(previous)
    }

    fn remove(&self, id: AccountId) -> Result<(), StoreError> {
        let (_, account) = self
            .accounts
            .remove(&id)
            .ok_or(StoreError::AccountNotFound { id })?;
        self.numbers.remove_if(&account.number, |_, owner| *owner == id);

        // Hand the id out again unless a later account already took the next one
        let _ = self
            .sequence
            .compare_exchange(id, id.saturating_sub(1), Ordering::SeqCst, Ordering::SeqCst);
        Ok(())
    }
}
