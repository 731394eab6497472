//! Thread-safe ledger handle for concurrent callers

use parking_lot::RwLock;
use std::sync::Arc;

use crate::ledger::{Block, Ledger, LedgerIntegrityReport};
use crate::traits::*;
use crate::types::*;

/// Cloneable handle to a single ledger guarded by one reader-writer lock
///
/// Every write runs under the write guard for its whole duration, so readers
/// never observe a transfer's debit without its credit.
#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<Ledger>>,
}

impl SharedLedger {
    /// Create a new shared ledger holding only the genesis block
    pub fn new() -> Self {
        Self::from_ledger(Ledger::new())
    }

    /// Create a new shared ledger with a custom validator
    pub fn with_validator(validator: Box<dyn LedgerValidator>) -> Self {
        Self::from_ledger(Ledger::with_validator(validator))
    }

    /// Wrap an existing ledger
    pub fn from_ledger(ledger: Ledger) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ledger)),
        }
    }

    pub fn set(&self, account_id: &str, balance: Balance) -> LedgerResult<()> {
        self.inner.write().set(account_id, balance)
    }

    pub fn advance(&self) -> Height {
        self.inner.write().advance()
    }

    pub fn get(&self, account_id: &str, height: Height) -> LedgerResult<Balance> {
        self.inner.read().get(account_id, height)
    }

    pub fn transfer(
        &self,
        source: &str,
        destination: &str,
        amount: Balance,
    ) -> LedgerResult<TransferReceipt> {
        self.inner.write().transfer(source, destination, amount)
    }

    pub fn height(&self) -> Height {
        self.inner.read().height()
    }

    /// Owned copy of the block at a given height
    pub fn snapshot(&self, height: Height) -> LedgerResult<Block> {
        self.inner.read().block(height).cloned()
    }

    pub fn history(&self, account_id: &str) -> Vec<(Height, Balance)> {
        self.inner.read().history(account_id)
    }

    pub fn validate_integrity(&self) -> LedgerIntegrityReport {
        self.inner.read().validate_integrity()
    }

    /// Run several reads under one guard
    pub fn read<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        f(&self.inner.read())
    }
}

impl Default for SharedLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl BalanceReader for SharedLedger {
    fn current_height(&self) -> Height {
        self.height()
    }

    fn balance_at(&self, account_id: &str, height: Height) -> LedgerResult<Balance> {
        self.get(account_id, height)
    }

    // Height and balance must come from the same guard
    fn balance(&self, account_id: &str) -> LedgerResult<Balance> {
        Ok(self.inner.read().balance(account_id))
    }
}
