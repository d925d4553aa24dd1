//! Wiring of stores, gate and locks into one ledger instance
//!
//! `Bank` constructs the account service, the transaction processor and the
//! batch processor over the same stores, gate and lock registry. Every handle
//! it gives out observes and mutates the same state.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::config::EngineConfig;
use crate::core::{
    AccountLocks, AccountService, BatchProcessor, ConcurrencyGate, InMemoryAccountStore,
    InMemoryAuditLog, InMemoryLedgerStore, ProcessingResult, Stores, TransactionProcessor,
};
use crate::types::{
    AccountId, BalanceView, LedgerEntry, LedgerError, StoreError, TransactionRequest,
    TransactionResult,
};

#[derive(Debug, Clone)]
pub struct Bank {
    accounts: AccountService,
    processor: TransactionProcessor,
    batches: BatchProcessor,
}

impl Bank {
    /// Wire a ledger over the given stores
    pub fn new(stores: Stores, gate_capacity: usize) -> Self {
        let locks = Arc::new(AccountLocks::new());
        let gate = ConcurrencyGate::new(gate_capacity);

        let accounts = AccountService::new(stores.clone(), Arc::clone(&locks));
        let processor = TransactionProcessor::new(stores, gate, locks);
        let batches = BatchProcessor::new(processor.clone());

        Self {
            accounts,
            processor,
            batches,
        }
    }

    /// A ledger over fresh in-memory stores
    pub fn in_memory(config: &EngineConfig) -> Self {
        let stores = Stores::new(
            Arc::new(InMemoryAccountStore::new()),
            Arc::new(InMemoryLedgerStore::new()),
            Arc::new(InMemoryAuditLog::new()),
        );
        Self::new(stores, config.gate_capacity)
    }

    pub fn accounts(&self) -> &AccountService {
        &self.accounts
    }

    pub fn processor(&self) -> &TransactionProcessor {
        &self.processor
    }

    pub fn stores(&self) -> &Stores {
        self.processor.stores()
    }

    pub async fn process_transfer(
        &self,
        from: AccountId,
        to: AccountId,
        amount: Decimal,
        description: Option<&str>,
    ) -> TransactionResult {
        self.processor
            .process_transfer(from, to, amount, description)
            .await
    }

    pub async fn process_deposit(
        &self,
        to: AccountId,
        amount: Decimal,
        description: Option<&str>,
    ) -> TransactionResult {
        self.processor.process_deposit(to, amount, description).await
    }

    pub async fn process_withdrawal(
        &self,
        from: AccountId,
        amount: Decimal,
        description: Option<&str>,
    ) -> TransactionResult {
        self.processor
            .process_withdrawal(from, amount, description)
            .await
    }

    pub async fn process_batch(&self, requests: Vec<TransactionRequest>) -> bool {
        self.batches.process_batch(requests).await
    }

    pub async fn process_batch_results(
        &self,
        requests: Vec<TransactionRequest>,
    ) -> Vec<ProcessingResult> {
        self.batches.process_batch_results(requests).await
    }

    pub async fn process_batch_with_timeout(
        &self,
        requests: Vec<TransactionRequest>,
        timeout: Duration,
    ) -> Result<bool, LedgerError> {
        self.batches
            .process_batch_with_timeout(requests, timeout)
            .await
    }

    pub async fn process_batch_results_with_timeout(
        &self,
        requests: Vec<TransactionRequest>,
        timeout: Duration,
    ) -> Result<Vec<ProcessingResult>, LedgerError> {
        self.batches
            .process_batch_results_with_timeout(requests, timeout)
            .await
    }

    pub fn get_balance(&self, account: AccountId) -> Result<Option<BalanceView>, StoreError> {
        self.processor.get_balance(account)
    }

    pub fn get_history(
        &self,
        account: AccountId,
        limit: Option<usize>,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        self.processor.get_history(account, limit)
    }
}
