//! In-memory audit recorder
//!
//! Every mutation the engine commits leaves an audit entry naming the table it
//! touched, the kind of change, the affected record and a readable description.
//! Entries are numbered in append order and never edited.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use dashmap::DashMap;

use super::traits::AuditSink;
use crate::types::{AuditDraft, AuditEntry, AuditId, StoreError};

/// Thread-safe audit log backed by `DashMap`
#[derive(Debug)]
pub struct InMemoryAuditLog {
    entries: DashMap<AuditId, AuditEntry>,
    sequence: AtomicU64,
}

impl InMemoryAuditLog {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            sequence: AtomicU64::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InMemoryAuditLog {
    fn default() -> Self {
        Self::new()
    }
}

impl AuditSink for InMemoryAuditLog {
    fn append(&self, draft: AuditDraft) -> Result<AuditEntry, StoreError> {
        let id = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let entry = AuditEntry {
            id,
            table: draft.table,
            operation: draft.operation,
            record_id: draft.record_id,
            description: draft.description,
            timestamp: Utc::now(),
        };

        self.entries.insert(id, entry.clone());

        tracing::debug!(
            audit_id = id,
            table = entry.table.as_str(),
            operation = %entry.operation,
            record_id = entry.record_id,
            "Audit entry recorded"
        );

        Ok(entry)
    }

    fn entries(&self) -> Result<Vec<AuditEntry>, StoreError> {
        let mut entries: Vec<AuditEntry> = self
            .entries
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        entries.sort_by_key(|entry| entry.id);
        Ok(entries)
    }

    fn recent(&self, limit: usize) -> Result<Vec<AuditEntry>, StoreError> {
        let mut entries = self.entries()?;
        entries.reverse();
        entries.truncate(limit);
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AuditOperation, AuditTable};

    fn draft(record_id: u64) -> AuditDraft {
        AuditDraft::new(AuditTable::Transactions, AuditOperation::Insert, record_id)
            .description(format!("Deposit: 10 to ACC{:010}", record_id))
    }

    #[test]
    fn test_append_assigns_sequential_ids() {
        let log = InMemoryAuditLog::new();

        let first = log.append(draft(1)).unwrap();
        let second = log.append(draft(2)).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.table, AuditTable::Transactions);
        assert_eq!(second.operation, AuditOperation::Insert);
        assert_eq!(second.record_id, 2);
    }

    #[test]
    fn test_entries_oldest_first_and_recent_newest_first() {
        let log = InMemoryAuditLog::new();
        for record in 1..=4 {
            log.append(draft(record)).unwrap();
        }

        let oldest: Vec<u64> = log.entries().unwrap().iter().map(|e| e.record_id).collect();
        assert_eq!(oldest, vec![1, 2, 3, 4]);

        let newest: Vec<u64> = log.recent(2).unwrap().iter().map(|e| e.record_id).collect();
        assert_eq!(newest, vec![4, 3]);
    }
}
