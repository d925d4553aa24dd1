//! Error types for the ledger engine
//!
//! Two layers of errors exist:
//!
//! - [`StoreError`]: faults raised by the backing stores (account store, ledger
//!   store, audit sink). These are the only truly exceptional conditions.
//! - [`LedgerError`]: every reason an operation can fail, including expected
//!   business outcomes. The processor converts these into failed
//!   `TransactionResult`s; the `Display` text is the user-visible message.
//!
//! # Error Categories
//!
//! - **Validation**: same-account transfer, non-positive amount, unknown type,
//!   balance overflow
//! - **NotFound**: referenced account missing or inactive
//! - **InsufficientFunds**: balance below the requested amount
//! - **System**: storage failure inside an atomic scope (always rolled back)

use rust_decimal::Decimal;
use thiserror::Error;

use super::account::AccountId;
use super::transaction::EntryId;

/// Faults raised by storage backends
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The backend could not complete the request (I/O, connection, injected fault)
    #[error("Storage unavailable: {message}")]
    Unavailable {
        /// Description of the underlying failure
        message: String,
    },

    /// Account numbers must be unique
    #[error("Duplicate account number {number}")]
    DuplicateAccountNumber { number: String },

    /// Account ids must be unique
    #[error("Duplicate account id {id}")]
    DuplicateAccountId { id: AccountId },

    /// A write referenced an account the store does not hold
    #[error("Account {id} does not exist in the store")]
    AccountNotFound { id: AccountId },

    /// A rollback referenced a ledger entry the store does not hold
    #[error("Entry {id} does not exist in the store")]
    EntryNotFound { id: EntryId },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        StoreError::Unavailable {
            message: message.into(),
        }
    }
}

/// Classification of a [`LedgerError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    InsufficientFunds,
    System,
}

/// Reasons a ledger operation did not complete
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("Cannot transfer to the same account")]
    SameAccount,

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Source account not found")]
    SourceNotFound,

    #[error("Destination account not found")]
    DestinationNotFound,

    #[error("Account not found")]
    AccountNotFound,

    /// The debited account cannot cover the amount
    ///
    /// The message stays terse; the figures are kept for logging.
    #[error("Insufficient funds")]
    InsufficientFunds {
        account: AccountId,
        available: Decimal,
        requested: Decimal,
    },

    /// Crediting the account would overflow the decimal range
    #[error("Amount exceeds the supported balance range")]
    ArithmeticOverflow { account: AccountId },

    #[error("Invalid transaction type")]
    InvalidTransactionType {
        /// The type string as submitted
        tx_type: String,
    },

    #[error(transparent)]
    Store(#[from] StoreError),

    /// The caller's wait bound on a batch elapsed
    #[error("Batch did not finish within {millis} ms")]
    BatchTimeout { millis: u128 },
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::SameAccount
            | LedgerError::InvalidAmount
            | LedgerError::ArithmeticOverflow { .. }
            | LedgerError::InvalidTransactionType { .. } => ErrorKind::Validation,
            LedgerError::SourceNotFound
            | LedgerError::DestinationNotFound
            | LedgerError::AccountNotFound => ErrorKind::NotFound,
            LedgerError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            LedgerError::Store(_) | LedgerError::BatchTimeout { .. } => ErrorKind::System,
        }
    }

    /// Whether this is an expected business outcome rather than a fault
    pub fn is_business(&self) -> bool {
        self.kind() != ErrorKind::System
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: AccountId, available: Decimal, requested: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account,
            available,
            requested,
        }
    }

    /// Create an InvalidTransactionType error
    pub fn invalid_transaction_type(tx_type: &str) -> Self {
        LedgerError::InvalidTransactionType {
            tx_type: tx_type.to_string(),
        }
    }
}
