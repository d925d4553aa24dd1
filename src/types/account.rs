//! Account-related types for the ledger engine
//!
//! This module defines the Account record and the read-only balance view
//! handed back to callers by `get_balance`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Account identifier, assigned sequentially by the account store
pub type AccountId = u32;

/// Ledger account
///
/// Accounts are created with a zero balance and active status. They are
/// deactivated (soft-deleted) rather than removed, and their balance is only
/// ever written by the transaction processor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Account {
    /// Store-assigned identifier
    pub id: AccountId,

    /// Unique account number (`ACC` followed by ten digits)
    pub number: String,

    /// Current balance
    ///
    /// Kept non-negative by withdrawal and transfer validation.
    pub balance: Decimal,

    /// Free-form account type label (e.g. "Savings")
    pub account_type: String,

    /// Whether the account accepts operations
    pub active: bool,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with zero balance and active status
    pub fn new(id: AccountId, number: String, account_type: &str) -> Self {
        Account {
            id,
            number,
            balance: Decimal::ZERO,
            account_type: account_type.to_string(),
            active: true,
            created_at: Utc::now(),
        }
    }
}

/// Snapshot of an account's balance as returned by `get_balance`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceView {
    pub account_id: AccountId,
    pub number: String,
    pub balance: Decimal,
    pub account_type: String,
}

impl From<&Account> for BalanceView {
    fn from(account: &Account) -> Self {
        BalanceView {
            account_id: account.id,
            number: account.number.clone(),
            balance: account.balance,
            account_type: account.account_type.clone(),
        }
    }
}
