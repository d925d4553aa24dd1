//! Atomic scope over the account, ledger and audit stores
//!
//! An `AtomicScope` groups every write of one operation so that they land
//! together or not at all:
//!
//! ```text
//! begin ──> read accounts ──> stage balance writes ──> commit(entry, audit)
//!                                    │                      │
//!                                    └── drop               ├─ 1. write balances   (undo recorded)
//!                                        (nothing applied)  ├─ 2. append ledger    (retract on failure)
//!                                                           └─ 3. append audit
//! ```
//!
//! Staged balance writes are not visible to anyone until `commit`; dropping an
//! uncommitted scope discards them. If any commit step fails, the steps
//! already applied are reverted in reverse order before the error is returned,
//! so a failed operation leaves no ledger entry, no audit entry and no balance
//! change behind.
//!
//! The scope does not lock anything itself; callers hold the per-account locks
//! of every account they stage a write for.

use rust_decimal::Decimal;

use super::traits::Stores;
use crate::types::{
    Account, AccountId, AuditDraft, AuditOperation, AuditTable, LedgerDraft, LedgerEntry,
    StoreError,
};

#[derive(Debug, Clone, Copy)]
struct BalanceWrite {
    account: AccountId,
    before: Decimal,
    after: Decimal,
}

/// Unit of work for one balance-changing operation
#[derive(Debug)]
pub struct AtomicScope<'a> {
    stores: &'a Stores,
    writes: Vec<BalanceWrite>,
    finished: bool,
}

impl<'a> AtomicScope<'a> {
    /// Open a scope against the given stores
    pub fn begin(stores: &'a Stores) -> Self {
        Self {
            stores,
            writes: Vec::with_capacity(2),
            finished: false,
        }
    }

    /// Read an active account, or `None` if it is missing or deactivated
    pub fn active_account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self
            .stores
            .accounts
            .get(id)?
            .filter(|account| account.active))
    }

    /// Stage a new balance for an account read through this scope
    pub fn stage_balance(&mut self, account: &Account, balance: Decimal) {
        self.writes.push(BalanceWrite {
            account: account.id,
            before: account.balance,
            after: balance,
        });
    }

    #[cfg(test)]
    fn staged(&self) -> usize {
        self.writes.len()
    }

    /// Apply staged writes, append the ledger entry and its audit record
    ///
    /// The audit record is an `INSERT` on `Transactions` whose record id is the
    /// id the ledger assigned to `entry`.
    pub fn commit(
        mut self,
        entry: LedgerDraft,
        audit_description: String,
    ) -> Result<LedgerEntry, StoreError> {
        let writes = std::mem::take(&mut self.writes);
        self.finished = true;

        let mut applied: Vec<BalanceWrite> = Vec::with_capacity(writes.len());
        for write in writes {
            if let Err(error) = self.stores.accounts.set_balance(write.account, write.after) {
                self.undo_balances(&applied);
                return Err(error);
            }
            applied.push(write);
        }

        let entry = match self.stores.ledger.append(entry) {
            Ok(entry) => entry,
            Err(error) => {
                self.undo_balances(&applied);
                return Err(error);
            }
        };

        let audit = AuditDraft::new(AuditTable::Transactions, AuditOperation::Insert, entry.id)
            .description(audit_description);
        if let Err(error) = self.stores.audit.append(audit) {
            if let Err(retract_error) = self.stores.ledger.retract(entry.id) {
                tracing::error!(
                    entry_id = entry.id,
                    error = %retract_error,
                    "Failed to retract ledger entry during rollback"
                );
            }
            self.undo_balances(&applied);
            return Err(error);
        }

        Ok(entry)
    }

    fn undo_balances(&self, applied: &[BalanceWrite]) {
        for write in applied.iter().rev() {
            if let Err(error) = self.stores.accounts.set_balance(write.account, write.before) {
                tracing::error!(
                    account = write.account,
                    error = %error,
                    "Failed to restore balance during rollback"
                );
            }
        }
        tracing::debug!(restored = applied.len(), "Atomic scope rolled back after failed commit");
    }
}

impl Drop for AtomicScope<'_> {
    fn drop(&mut self) {
        if !self.finished && !self.writes.is_empty() {
            tracing::debug!(
                staged = self.writes.len(),
                "Atomic scope dropped without commit, staged writes discarded"
            );
        }
    }
}
