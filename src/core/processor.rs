//! Transaction processing orchestration
//!
//! This module provides the `TransactionProcessor`, the sole writer of account
//! balances and the sole creator of ledger and audit entries.
//!
//! # Design
//!
//! Every balance-changing operation walks the same path:
//!
//! ```text
//! Requested ──> Admitted ──> Validating ──┬──> Rejected
//!            (gate permit)  (account locks)├──> Mutating ──> Committed
//!                                          └──> Mutating ──> RolledBack
//! ```
//!
//! Argument checks that need no storage (same account, non-positive amount)
//! run right after admission. The per-account locks are then taken, so the
//! balances read during validation are the balances the commit overwrites.
//!
//! # Architecture
//!
//! ```text
//! TransactionProcessor
//!     ├── Stores               (account, ledger and audit backends)
//!     ├── ConcurrencyGate      (global admission throttle)
//!     └── Arc<AccountLocks>    (per-account serialisation)
//! ```
//!
//! # Failure policy
//!
//! No operation returns `Err`. Business rejections become failed results whose
//! message is the rejection reason; storage faults roll the scope back and
//! become `"<Operation> failed due to system error"`.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{debug, error, info};

use super::gate::ConcurrencyGate;
use super::locks::AccountLocks;
use super::scope::AtomicScope;
use super::traits::Stores;
use crate::types::{
    AccountId, BalanceView, LedgerDraft, LedgerEntry, LedgerError, StoreError, TransactionRequest,
    TransactionResult, TransactionType,
};

/// Committed entry and the balance reported back to the caller
type Outcome = (LedgerEntry, Decimal);

/// Balance-changing operations over a set of stores
///
/// The processor is cheap to clone and every clone shares the same gate and
/// lock registry, so clones can be moved into spawned tasks freely.
#[derive(Debug, Clone)]
pub struct TransactionProcessor {
    stores: Stores,
    gate: ConcurrencyGate,
    locks: Arc<AccountLocks>,
}

impl TransactionProcessor {
    /// Create a new TransactionProcessor
    ///
    /// # Arguments
    ///
    /// * `stores` - Backends holding accounts, ledger entries and audit entries
    /// * `gate` - Admission gate shared by all mutating operations
    /// * `locks` - Per-account lock registry; share it with any other component
    ///   that mutates accounts (e.g. the account service)
    pub fn new(stores: Stores, gate: ConcurrencyGate, locks: Arc<AccountLocks>) -> Self {
        Self {
            stores,
            gate,
            locks,
        }
    }

    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn gate(&self) -> &ConcurrencyGate {
        &self.gate
    }

    /// Move funds between two active accounts
    ///
    /// Checks run in this order and the first failure wins:
    /// 1. `from != to`
    /// 2. `amount > 0`
    /// 3. `from` is an active account
    /// 4. `to` is an active account
    /// 5. the source balance covers `amount`
    ///
    /// # Returns
    ///
    /// A successful result carries the ledger entry id and the new balance of
    /// the source account.
    pub async fn process_transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        description: Option<&str>,
    ) -> TransactionResult {
        let _permit = self.gate.acquire().await;

        match self.transfer(from, to, amount, description).await {
            Ok((entry, balance)) => {
                info!(entry_id = entry.id, from, to, amount = %amount, "Transfer committed");
                TransactionResult::completed(entry.id, "Transfer completed successfully", balance)
            }
            Err(error) => Self::reject(TransactionType::Transfer, error),
        }
    }

    async fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<Outcome, LedgerError> {
        if from == to {
            return Err(LedgerError::SameAccount);
        }
        validate_amount(amount)?;

        let _guard = self.locks.lock_pair(from, to).await;
        let mut scope = AtomicScope::begin(&self.stores);

        let source = scope
            .active_account(from)?
            .ok_or(LedgerError::SourceNotFound)?;
        let destination = scope
            .active_account(to)?
            .ok_or(LedgerError::DestinationNotFound)?;

        if source.balance < amount {
            return Err(LedgerError::insufficient_funds(from, source.balance, amount));
        }

        let source_balance = source.balance - amount;
        let destination_balance = destination
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow { account: to })?;

        scope.stage_balance(&source, source_balance);
        scope.stage_balance(&destination, destination_balance);

        let draft = LedgerDraft {
            from_account: Some(from),
            to_account: Some(to),
            amount,
            tx_type: TransactionType::Transfer,
            description: describe(TransactionType::Transfer, description),
        };
        let audit = format!(
            "Transfer: {} from {} to {}",
            amount, source.number, destination.number
        );

        let entry = scope.commit(draft, audit)?;
        Ok((entry, source_balance))
    }

    /// Credit funds to an active account
    ///
    /// # Returns
    ///
    /// A successful result carries the ledger entry id and the new balance.
    /// Fails with `"Amount must be greater than zero"` or `"Account not found"`.
    pub async fn process_deposit(
        &self,
        to: AccountId,
        amount: Decimal,
        description: Option<&str>,
    ) -> TransactionResult {
        let _permit = self.gate.acquire().await;

        match self.deposit(to, amount, description).await {
            Ok((entry, balance)) => {
                info!(entry_id = entry.id, account = to, amount = %amount, "Deposit committed");
                TransactionResult::completed(entry.id, "Deposit completed successfully", balance)
            }
            Err(error) => Self::reject(TransactionType::Deposit, error),
        }
    }

    async fn deposit(
        &self,
        to: AccountId,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<Outcome, LedgerError> {
        validate_amount(amount)?;

        let _guard = self.locks.lock(to).await;
        let mut scope = AtomicScope::begin(&self.stores);

        let account = scope
            .active_account(to)?
            .ok_or(LedgerError::AccountNotFound)?;
        let balance = account
            .balance
            .checked_add(amount)
            .ok_or(LedgerError::ArithmeticOverflow { account: to })?;

        scope.stage_balance(&account, balance);

        let draft = LedgerDraft {
            from_account: None,
            to_account: Some(to),
            amount,
            tx_type: TransactionType::Deposit,
            description: describe(TransactionType::Deposit, description),
        };
        let audit = format!("Deposit: {} to {}", amount, account.number);

        let entry = scope.commit(draft, audit)?;
        Ok((entry, balance))
    }

    /// Debit funds from an active account
    ///
    /// # Returns
    ///
    /// A successful result carries the ledger entry id and the new balance.
    /// Fails with `"Amount must be greater than zero"`, `"Account not found"`
    /// or `"Insufficient funds"`.
    pub async fn process_withdrawal(
        &self,
        from: AccountId,
        amount: Decimal,
        description: Option<&str>,
    ) -> TransactionResult {
        let _permit = self.gate.acquire().await;

        match self.withdrawal(from, amount, description).await {
            Ok((entry, balance)) => {
                info!(entry_id = entry.id, account = from, amount = %amount, "Withdrawal committed");
                TransactionResult::completed(entry.id, "Withdrawal completed successfully", balance)
            }
            Err(error) => Self::reject(TransactionType::Withdrawal, error),
        }
    }

    async fn withdrawal(
        &self,
        from: AccountId,
        amount: Decimal,
        description: Option<&str>,
    ) -> Result<Outcome, LedgerError> {
        validate_amount(amount)?;

        let _guard = self.locks.lock(from).await;
        let mut scope = AtomicScope::begin(&self.stores);

        let account = scope
            .active_account(from)?
            .ok_or(LedgerError::AccountNotFound)?;
        if account.balance < amount {
            return Err(LedgerError::insufficient_funds(from, account.balance, amount));
        }
        let balance = account.balance - amount;

        scope.stage_balance(&account, balance);

        let draft = LedgerDraft {
            from_account: Some(from),
            to_account: None,
            amount,
            tx_type: TransactionType::Withdrawal,
            description: describe(TransactionType::Withdrawal, description),
        };
        let audit = format!("Withdrawal: {} from {}", amount, account.number);

        let entry = scope.commit(draft, audit)?;
        Ok((entry, balance))
    }

    /// Route a typed request to the matching operation
    ///
    /// An unrecognised type fails without touching storage. A request missing
    /// the id its type needs fails with the matching not-found message, after
    /// the argument checks that do not depend on it.
    pub async fn dispatch(&self, request: &TransactionRequest) -> TransactionResult {
        let tx_type = match request.transaction_type.parse::<TransactionType>() {
            Ok(tx_type) => tx_type,
            Err(error) => {
                debug!(tx_type = %request.transaction_type, "Unrecognised transaction type");
                return TransactionResult::failed(error.to_string());
            }
        };

        let description = request.description.as_deref();
        let amount = request.amount;

        match (tx_type, request.from_account, request.to_account) {
            (TransactionType::Transfer, Some(from), Some(to)) => {
                self.process_transfer(from, to, amount, description).await
            }
            (TransactionType::Deposit, _, Some(to)) => {
                self.process_deposit(to, amount, description).await
            }
            (TransactionType::Withdrawal, Some(from), _) => {
                self.process_withdrawal(from, amount, description).await
            }
            (tx_type, from, _) => {
                let error = validate_amount(amount).err().unwrap_or(match tx_type {
                    TransactionType::Transfer if from.is_none() => LedgerError::SourceNotFound,
                    TransactionType::Transfer => LedgerError::DestinationNotFound,
                    _ => LedgerError::AccountNotFound,
                });
                Self::reject(tx_type, error)
            }
        }
    }

    /// Current balance of an active account, `None` if missing or inactive
    pub fn get_balance(&self, account: AccountId) -> Result<Option<BalanceView>, StoreError> {
        Ok(self
            .stores
            .accounts
            .get(account)?
            .filter(|account| account.active)
            .map(|account| BalanceView::from(&account)))
    }

    /// Ledger entries touching the account, most recent first
    ///
    /// Empty when the account has no entries or does not exist.
    pub fn get_history(
        &self,
        account: AccountId,
        limit: Option<usize>,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let mut entries = self.stores.ledger.by_account(account)?;
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    fn reject(tx_type: TransactionType, error: LedgerError) -> TransactionResult {
        if error.is_business() {
            debug!(operation = %tx_type, reason = %error, "Operation rejected");
            TransactionResult::failed(error.to_string())
        } else {
            error!(operation = %tx_type, error = %error, "Operation rolled back");
            TransactionResult::failed(format!("{} failed due to system error", tx_type))
        }
    }
}

fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount <= Decimal::ZERO {
        return Err(LedgerError::InvalidAmount);
    }
    Ok(())
}

fn describe(tx_type: TransactionType, description: Option<&str>) -> String {
    match description {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => tx_type.default_description().to_string(),
    }
}
