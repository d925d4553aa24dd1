//! Thread-safe in-memory ledger store
//!
//! This module provides the `InMemoryLedgerStore` struct, which keeps the
//! append-only history of committed operations.
//!
//! # Design
//!
//! Entries live in a `DashMap` keyed by entry id. A second `DashMap` indexes
//! entry ids by account so history lookups never scan the whole ledger; this is
//! the explicit replacement for account ↔ transaction back-references.
//!
//! # Purpose
//!
//! The ledger is the record of what happened. Entries are never updated once
//! written; `retract` only exists so an atomic scope can undo its own append
//! before the operation is reported as committed.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;

use super::traits::LedgerStore;
use crate::types::{
    AccountId, EntryId, LedgerDraft, LedgerEntry, StoreError, TransactionStatus,
};

/// Thread-safe ledger store backed by `DashMap`
#[derive(Debug)]
pub struct InMemoryLedgerStore {
    /// Ledger entries by id
    entries: DashMap<EntryId, LedgerEntry>,

    /// Entry ids by account (source or destination)
    by_account: DashMap<AccountId, Vec<EntryId>>,

    /// Last assigned id
    sequence: AtomicU64,
}

impl InMemoryLedgerStore {
    /// Create a new empty store. The first entry gets id 1.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            by_account: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn index(&self, account: AccountId, id: EntryId) {
        self.by_account.entry(account).or_default().push(id);
    }

    fn unindex(&self, account: AccountId, id: EntryId) {
        if let Some(mut ids) = self.by_account.get_mut(&account) {
            ids.retain(|existing| *existing != id);
        }
    }
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Most recent first; entries committed within the same instant fall back to id order
fn sort_recent_first(entries: &mut [LedgerEntry]) {
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
}

impl LedgerStore for InMemoryLedgerStore {
    fn append(&self, draft: LedgerDraft) -> Result<LedgerEntry, StoreError> {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let entry = LedgerEntry {
            id,
            from_account: draft.from_account,
            to_account: draft.to_account,
            amount: draft.amount,
            tx_type: draft.tx_type,
            timestamp: Utc::now(),
            status: TransactionStatus::Completed,
            description: draft.description,
        };

        self.entries.insert(id, entry.clone());
        if let Some(from) = entry.from_account {
            self.index(from, id);
        }
        if let Some(to) = entry.to_account {
            self.index(to, id);
        }

        Ok(entry)
    }

    fn retract(&self, id: EntryId) -> Result<(), StoreError> {
        let (_, entry) = self
            .entries
            .remove(&id)
            .ok_or(StoreError::EntryNotFound { id })?;

        if let Some(from) = entry.from_account {
            self.unindex(from, id);
        }
        if let Some(to) = entry.to_account {
            self.unindex(to, id);
        }
        Ok(())
    }

    fn get(&self, id: EntryId) -> Result<Option<LedgerEntry>, StoreError> {
        Ok(self.entries.get(&id).map(|entry| entry.value().clone()))
    }

    fn by_account(&self, account: AccountId) -> Result<Vec<LedgerEntry>, StoreError> {
        // Release the index shard before reading entries
        let ids = self
            .by_account
            .get(&account)
            .map(|ids| ids.value().clone())
            .unwrap_or_default();

        let mut entries: Vec<LedgerEntry> = ids
            .iter()
            .filter_map(|id| self.entries.get(id).map(|entry| entry.value().clone()))
            .collect();
        sort_recent_first(&mut entries);
        Ok(entries)
    }

    fn all(&self) -> Result<Vec<LedgerEntry>, StoreError> {
        let mut entries: Vec<LedgerEntry> = self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        sort_recent_first(&mut entries);
        Ok(entries)
    }
}
