//! Account lifecycle operations
//!
//! `AccountService` is the CRUD surface over the account store. It never
//! touches balances; those belong to the `TransactionProcessor`. Reads only
//! ever return active accounts, and deactivation is a soft delete.

use std::sync::Arc;

use tracing::{error, info};

use super::locks::AccountLocks;
use super::traits::Stores;
use crate::types::{Account, AccountId, AuditDraft, AuditOperation, AuditTable, StoreError};

/// Create, look up and deactivate accounts
#[derive(Debug, Clone)]
pub struct AccountService {
    stores: Stores,

    /// Shared with the processor so deactivation never interleaves with an
    /// in-flight balance change on the same account
    locks: Arc<AccountLocks>,
}

impl AccountService {
    pub fn new(stores: Stores, locks: Arc<AccountLocks>) -> Self {
        Self { stores, locks }
    }

    /// Open a new account with a zero balance
    ///
    /// The account is recorded in the audit trail as an `INSERT` on
    /// `Accounts`. If that record cannot be written the account is removed
    /// from the store again and the audit error returned.
    pub fn create_account(&self, account_type: &str) -> Result<Account, StoreError> {
        let account = self.stores.accounts.create(account_type)?;

        let audit = AuditDraft::new(AuditTable::Accounts, AuditOperation::Insert, account.id.into())
            .description(format!(
                "Created {} account {}",
                account.account_type, account.number
            ));
        if let Err(audit_error) = self.stores.audit.append(audit) {
            error!(account = account.id, error = %audit_error, "Account creation rolled back");
            if let Err(remove_error) = self.stores.accounts.remove(account.id) {
                error!(
                    account = account.id,
                    error = %remove_error,
                    "Failed to remove account during rollback"
                );
            }
            return Err(audit_error);
        }

        info!(account = account.id, number = %account.number, "Account created");
        Ok(account)
    }

    /// Get an active account by id
    pub fn get_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.stores.accounts.get(id)?.filter(|account| account.active))
    }

    /// Get an active account by its number
    pub fn get_account_by_number(&self, number: &str) -> Result<Option<Account>, StoreError> {
        Ok(self
            .stores
            .accounts
            .get_by_number(number)?
            .filter(|account| account.active))
    }

    /// All active accounts ordered by id
    pub fn get_all_accounts(&self) -> Result<Vec<Account>, StoreError> {
        Ok(self
            .stores
            .accounts
            .list()?
            .into_iter()
            .filter(|account| account.active)
            .collect())
    }

    /// Soft-delete an account
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The account was active and is now deactivated
    /// * `Ok(false)` - The account does not exist or was already inactive
    pub async fn deactivate_account(&self, id: AccountId) -> Result<bool, StoreError> {
        let _guard = self.locks.lock(id).await;

        let account = match self.get_account(id)? {
            Some(account) => account,
            None => return Ok(false),
        };

        self.stores.accounts.set_active(id, false)?;

        let audit = AuditDraft::new(AuditTable::Accounts, AuditOperation::Update, id.into())
            .description(format!("Deactivated account {}", account.number));
        if let Err(audit_error) = self.stores.audit.append(audit) {
            error!(account = id, error = %audit_error, "Account deactivation rolled back");
            if let Err(restore_error) = self.stores.accounts.set_active(id, true) {
                error!(
                    account = id,
                    error = %restore_error,
                    "Failed to reactivate account during rollback"
                );
            }
            return Err(audit_error);
        }

        info!(account = id, "Account deactivated");
        Ok(true)
    }
}
