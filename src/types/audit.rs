//! Audit trail types
//!
//! Audit entries are a supplementary, append-only description of every
//! mutation, kept separate from the ledger itself.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Audit entry identifier
pub type AuditId = u64;

/// Logical table touched by a mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuditTable {
    Accounts,
    Transactions,
}

impl AuditTable {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditTable::Accounts => "Accounts",
            AuditTable::Transactions => "Transactions",
        }
    }
}

/// Kind of mutation recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuditOperation {
    Insert,
    Update,
}

impl AuditOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOperation::Insert => "INSERT",
            AuditOperation::Update => "UPDATE",
        }
    }
}

impl fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audit entry before the sink assigns its id and timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct AuditDraft {
    pub table: AuditTable,
    pub operation: AuditOperation,
    pub record_id: u64,
    pub description: String,
}

impl AuditDraft {
    pub fn new(table: AuditTable, operation: AuditOperation, record_id: u64) -> Self {
        Self {
            table,
            operation,
            record_id,
            description: String::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Immutable audit record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub id: AuditId,
    pub table: AuditTable,
    pub operation: AuditOperation,
    pub record_id: u64,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}
