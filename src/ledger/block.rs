//! Block snapshot model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::*;

/// Snapshot of every account balance at one height
///
/// Only the ledger can mutate a block, and only while it is the current one.
/// Once a later block is appended the snapshot is never touched again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    height: Height,
    balances: BTreeMap<AccountId, Balance>,
    created_at: NaiveDateTime,
}

impl Block {
    /// Create the empty genesis block
    pub(crate) fn genesis() -> Self {
        Self {
            height: 0,
            balances: BTreeMap::new(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Create the next block as an independent copy of this one's entries
    pub(crate) fn successor(&self) -> Self {
        Self {
            height: self.height + 1,
            balances: self.balances.clone(),
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Height of this block
    pub fn height(&self) -> Height {
        self.height
    }

    /// When this block was created
    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    /// Balance of an account, zero when the account has no entry
    pub fn balance_of(&self, account_id: &str) -> Balance {
        self.balances.get(account_id).copied().unwrap_or(0)
    }

    /// Whether the account has an explicit entry in this block
    pub fn contains(&self, account_id: &str) -> bool {
        self.balances.contains_key(account_id)
    }

    /// All entries of this block
    pub fn balances(&self) -> &BTreeMap<AccountId, Balance> {
        &self.balances
    }

    /// Account identifiers with an entry in this block, in sorted order
    pub fn accounts(&self) -> impl Iterator<Item = &str> {
        self.balances.keys().map(String::as_str)
    }

    /// Number of accounts with an entry
    pub fn len(&self) -> usize {
        self.balances.len()
    }

    /// Whether no account has an entry
    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Sum of all balances; widened so it cannot overflow
    pub fn total_supply(&self) -> i128 {
        self.balances.values().map(|b| i128::from(*b)).sum()
    }

    /// Reject balances that may not be stored in a block
    pub(crate) fn check_balance(balance: Balance) -> LedgerResult<()> {
        if balance < 0 {
            return Err(LedgerError::InvalidAmount { amount: balance });
        }
        Ok(())
    }

    /// Overwrite an account's balance; callers run [`Block::check_balance`] first
    pub(crate) fn insert_balance(&mut self, account_id: &str, balance: Balance) {
        self.balances.insert(account_id.to_string(), balance);
    }

    /// Compute the post-transfer balances of source and destination
    ///
    /// Pure check; nothing is written until [`Block::commit_transfer`].
    pub(crate) fn plan_transfer(
        &self,
        source: &str,
        destination: &str,
        amount: Balance,
    ) -> LedgerResult<(Balance, Balance)> {
        if amount < 0 {
            return Err(LedgerError::InvalidAmount { amount });
        }

        let source_balance = self.balance_of(source);
        if amount > source_balance {
            return Err(LedgerError::InsufficientBalance {
                account: source.to_string(),
                balance: source_balance,
                requested: amount,
            });
        }

        // Debit and credit cancel out
        if source == destination {
            return Ok((source_balance, source_balance));
        }

        let destination_balance = self
            .balance_of(destination)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow {
                account: destination.to_string(),
            })?;

        Ok((source_balance - amount, destination_balance))
    }

    /// Write balances produced by [`Block::plan_transfer`]
    pub(crate) fn commit_transfer(
        &mut self,
        source: &str,
        destination: &str,
        (source_balance, destination_balance): (Balance, Balance),
    ) {
        self.balances.insert(source.to_string(), source_balance);
        self.balances
            .insert(destination.to_string(), destination_balance);
    }
}
