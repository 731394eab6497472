//! Core types and data structures for the snapshot ledger

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account balance. Signed so negative inputs can be rejected, but every
/// balance stored in a block is non-negative.
pub type Balance = i64;

/// Zero-based index of a block within the ledger
pub type Height = usize;

/// Opaque account identifier
pub type AccountId = String;

/// Record of a transfer applied to the current block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferReceipt {
    /// Unique identifier for this transfer
    pub id: Uuid,
    /// Height of the block the transfer was applied to
    pub height: Height,
    /// Debited account
    pub source: AccountId,
    /// Credited account
    pub destination: AccountId,
    /// Amount moved
    pub amount: Balance,
    /// Source balance after the transfer
    pub source_balance: Balance,
    /// Destination balance after the transfer
    pub destination_balance: Balance,
    /// When the transfer was applied
    pub executed_at: NaiveDateTime,
}

impl TransferReceipt {
    pub(crate) fn new(
        height: Height,
        source: &str,
        destination: &str,
        amount: Balance,
        source_balance: Balance,
        destination_balance: Balance,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            height,
            source: source.to_string(),
            destination: destination.to_string(),
            amount,
            source_balance,
            destination_balance,
            executed_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Whether source and destination are the same account
    pub fn is_self_transfer(&self) -> bool {
        self.source == self.destination
    }
}

/// Errors that can occur in the ledger system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum LedgerError {
    #[error("Invalid amount: {amount} (balances and transfer amounts cannot be negative)")]
    InvalidAmount { amount: Balance },
    #[error("Insufficient balance: account '{account}' holds {balance}, transfer requires {requested}")]
    InsufficientBalance {
        account: AccountId,
        balance: Balance,
        requested: Balance,
    },
    #[error("Block height {requested} does not exist (current height is {current})")]
    HeightOutOfRange { requested: Height, current: Height },
    #[error("Balance overflow: crediting account '{account}' exceeds the maximum balance")]
    BalanceOverflow { account: AccountId },
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
