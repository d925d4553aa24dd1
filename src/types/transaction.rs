//! Transaction-related types for the ledger engine
//!
//! This module defines ledger entries (the immutable record of a committed
//! operation), the requests callers submit and the structured results they
//! get back.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::account::AccountId;
use super::error::LedgerError;

/// Ledger entry identifier, assigned sequentially by the ledger store
pub type EntryId = u64;

/// Balance-changing operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Move funds between two active accounts
    Transfer,

    /// Credit funds to an account
    Deposit,

    /// Debit funds from an account (requires sufficient balance)
    Withdrawal,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Transfer => "Transfer",
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
        }
    }

    /// Description used when the caller does not provide one
    pub fn default_description(&self) -> &'static str {
        match self {
            TransactionType::Transfer => "Transfer between accounts",
            TransactionType::Deposit => "Account deposit",
            TransactionType::Withdrawal => "Account withdrawal",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "transfer" => Ok(TransactionType::Transfer),
            "deposit" => Ok(TransactionType::Deposit),
            "withdrawal" => Ok(TransactionType::Withdrawal),
            _ => Err(LedgerError::invalid_transaction_type(s)),
        }
    }
}

/// Terminal status of a ledger entry
///
/// Entries are only written for committed operations, so the processor always
/// records `Completed`. `Failed` exists for stores that import external history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Completed,
    Failed,
}

/// Ledger entry awaiting an id from the ledger store
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerDraft {
    pub from_account: Option<AccountId>,
    pub to_account: Option<AccountId>,
    pub amount: Decimal,
    pub tx_type: TransactionType,
    pub description: String,
}

/// Immutable record of one committed balance-changing operation
///
/// Deposits carry only `to_account`, withdrawals only `from_account`,
/// transfers both.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub from_account: Option<AccountId>,
    pub to_account: Option<AccountId>,
    pub amount: Decimal,
    pub tx_type: TransactionType,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
    pub description: String,
}

impl LedgerEntry {
    /// Whether the given account is the source or destination of this entry
    #[cfg(test)]
    pub(crate) fn involves(&self, account: AccountId) -> bool {
        self.from_account == Some(account) || self.to_account == Some(account)
    }
}

/// Typed request as submitted to `process_batch`
///
/// `transaction_type` is kept as free text: an unrecognised type is a failed
/// result for that item, not a parse error for the whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub from_account: Option<AccountId>,
    pub to_account: Option<AccountId>,
    pub amount: Decimal,
    pub transaction_type: String,
    pub description: Option<String>,
}

impl TransactionRequest {
    pub fn transfer(from: AccountId, to: AccountId, amount: Decimal) -> Self {
        TransactionRequest {
            from_account: Some(from),
            to_account: Some(to),
            amount,
            transaction_type: TransactionType::Transfer.as_str().to_string(),
            description: None,
        }
    }

    pub fn deposit(to: AccountId, amount: Decimal) -> Self {
        TransactionRequest {
            from_account: None,
            to_account: Some(to),
            amount,
            transaction_type: TransactionType::Deposit.as_str().to_string(),
            description: None,
        }
    }

    pub fn withdrawal(from: AccountId, amount: Decimal) -> Self {
        TransactionRequest {
            from_account: Some(from),
            to_account: None,
            amount,
            transaction_type: TransactionType::Withdrawal.as_str().to_string(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

/// Structured outcome of a balance-changing operation
///
/// Business rejections and system failures are both reported here with
/// `success == false`; callers never see a partially applied operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionResult {
    pub success: bool,
    pub transaction_id: Option<EntryId>,
    pub message: String,
    pub new_balance: Option<Decimal>,
}

impl TransactionResult {
    pub fn completed(entry_id: EntryId, message: &str, new_balance: Decimal) -> Self {
        TransactionResult {
            success: true,
            transaction_id: Some(entry_id),
            message: message.to_string(),
            new_balance: Some(new_balance),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        TransactionResult {
            success: false,
            transaction_id: None,
            message: message.into(),
            new_balance: None,
        }
    }
}
