//! Traits for validation policy and read access

use crate::types::*;

/// Trait for implementing custom write validation rules
///
/// The ledger always enforces its own invariants (no negative balances, no
/// overdrawn transfers) before consulting the validator. A validator can only
/// narrow what is accepted, never widen it.
pub trait LedgerValidator: Send + Sync {
    /// Validate a balance assignment before it is written
    fn validate_set(&self, account_id: &str, balance: Balance) -> LedgerResult<()>;

    /// Validate a transfer before it is applied
    fn validate_transfer(&self, source: &str, destination: &str, amount: Balance)
        -> LedgerResult<()>;
}

/// Default validator that adds no rules beyond the ledger's own
pub struct DefaultLedgerValidator;

impl LedgerValidator for DefaultLedgerValidator {
    fn validate_set(&self, _account_id: &str, _balance: Balance) -> LedgerResult<()> {
        Ok(())
    }

    fn validate_transfer(
        &self,
        _source: &str,
        _destination: &str,
        _amount: Balance,
    ) -> LedgerResult<()> {
        Ok(())
    }
}

/// Read access to balances by height
///
/// Lets an embedding application query balances without caring whether it
/// holds a plain [`Ledger`](crate::Ledger) or a [`SharedLedger`](crate::utils::SharedLedger).
pub trait BalanceReader {
    /// Height of the current block
    fn current_height(&self) -> Height;

    /// Balance of an account at a given height
    fn balance_at(&self, account_id: &str, height: Height) -> LedgerResult<Balance>;

    /// Balance of an account in the current block
    fn balance(&self, account_id: &str) -> LedgerResult<Balance> {
        self.balance_at(account_id, self.current_height())
    }
}
