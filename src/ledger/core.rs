//! Main ledger that owns the block sequence and applies every operation

use serde::{Deserialize, Serialize};

use crate::ledger::Block;
use crate::traits::*;
use crate::types::*;

/// Append-only sequence of balance snapshots
///
/// Height 0 is the empty genesis block. `set` and `transfer` only ever touch
/// the current (last) block; `advance` freezes it by appending a copy.
pub struct Ledger {
    blocks: Vec<Block>,
    validator: Box<dyn LedgerValidator>,
}

impl Ledger {
    /// Create a new ledger holding only the genesis block
    pub fn new() -> Self {
        Self::with_validator(Box::new(DefaultLedgerValidator))
    }

    /// Create a new ledger with a custom validator
    pub fn with_validator(validator: Box<dyn LedgerValidator>) -> Self {
        Self {
            blocks: vec![Block::genesis()],
            validator,
        }
    }

    /// Height of the current block
    pub fn height(&self) -> Height {
        self.blocks.len() - 1
    }

    /// Number of blocks, genesis included
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Always false: a ledger holds at least the genesis block
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Write a balance for an account in the current block
    pub fn set(&mut self, account_id: &str, balance: Balance) -> LedgerResult<()> {
        let height = self.height();
        let result = self.try_set(height, account_id, balance);
        match &result {
            Ok(()) => tracing::debug!(account = account_id, balance, height, "balance set"),
            Err(e) => tracing::debug!(
                account = account_id,
                balance,
                height,
                error = %e,
                "set rejected"
            ),
        }
        result
    }

    fn try_set(&mut self, height: Height, account_id: &str, balance: Balance) -> LedgerResult<()> {
        Block::check_balance(balance)?;
        self.validator.validate_set(account_id, balance)?;
        self.blocks[height].insert_balance(account_id, balance);
        Ok(())
    }

    /// Append a copy of the current block and make it the new current block
    ///
    /// Returns the new height.
    pub fn advance(&mut self) -> Height {
        let next = self.current_block().successor();
        let accounts = next.len();
        self.blocks.push(next);

        let height = self.height();
        tracing::info!(height, accounts, "advanced to new block");
        height
    }

    /// Balance of an account at a given height
    ///
    /// Accounts without an entry read as zero.
    pub fn get(&self, account_id: &str, height: Height) -> LedgerResult<Balance> {
        Ok(self.block(height)?.balance_of(account_id))
    }

    /// Move `amount` from `source` to `destination` within the current block
    ///
    /// Either both balances change or neither does.
    pub fn transfer(
        &mut self,
        source: &str,
        destination: &str,
        amount: Balance,
    ) -> LedgerResult<TransferReceipt> {
        let height = self.height();
        let result = self.try_transfer(height, source, destination, amount);
        match &result {
            Ok(receipt) => tracing::debug!(
                id = %receipt.id,
                source,
                destination,
                amount,
                height,
                "transfer applied"
            ),
            Err(e) => tracing::debug!(
                source,
                destination,
                amount,
                height,
                error = %e,
                "transfer rejected"
            ),
        }
        result
    }

    fn try_transfer(
        &mut self,
        height: Height,
        source: &str,
        destination: &str,
        amount: Balance,
    ) -> LedgerResult<TransferReceipt> {
        let planned = self.blocks[height].plan_transfer(source, destination, amount)?;
        self.validator
            .validate_transfer(source, destination, amount)?;

        self.blocks[height].commit_transfer(source, destination, planned);

        let (source_balance, destination_balance) = planned;
        Ok(TransferReceipt::new(
            height,
            source,
            destination,
            amount,
            source_balance,
            destination_balance,
        ))
    }

    /// Block at a given height
    pub fn block(&self, height: Height) -> LedgerResult<&Block> {
        self.blocks
            .get(height)
            .ok_or_else(|| LedgerError::HeightOutOfRange {
                requested: height,
                current: self.height(),
            })
    }

    /// The current (latest) block
    pub fn current_block(&self) -> &Block {
        &self.blocks[self.height()]
    }

    /// The genesis block
    pub fn genesis(&self) -> &Block {
        &self.blocks[0]
    }

    /// All blocks in height order
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Balance of an account in the current block
    pub fn balance(&self, account_id: &str) -> Balance {
        self.current_block().balance_of(account_id)
    }

    /// Balance of an account at every height
    pub fn history(&self, account_id: &str) -> Vec<(Height, Balance)> {
        self.blocks
            .iter()
            .map(|block| (block.height(), block.balance_of(account_id)))
            .collect()
    }

    /// Sum of all balances at a given height
    pub fn total_supply(&self, height: Height) -> LedgerResult<i128> {
        Ok(self.block(height)?.total_supply())
    }

    /// Validate the integrity of the ledger
    pub fn validate_integrity(&self) -> LedgerIntegrityReport {
        let mut issues = Vec::new();

        for (position, block) in self.blocks.iter().enumerate() {
            if block.height() != position {
                issues.push(format!(
                    "Block at position {} records height {}",
                    position,
                    block.height()
                ));
            }

            for (account, balance) in block.balances() {
                if *balance < 0 {
                    issues.push(format!(
                        "Account '{}' has negative balance {} at height {}",
                        account, balance, position
                    ));
                }
            }
        }

        // Entries are never removed, so every account must survive into the next block
        for pair in self.blocks.windows(2) {
            let (previous, next) = (&pair[0], &pair[1]);
            for account in previous.accounts() {
                if !next.contains(account) {
                    issues.push(format!(
                        "Account '{}' at height {} is missing from height {}",
                        account,
                        previous.height(),
                        next.height()
                    ));
                }
            }
        }

        LedgerIntegrityReport {
            height: self.height(),
            block_count: self.len(),
            is_valid: issues.is_empty(),
            issues,
            total_supply: self.current_block().total_supply(),
        }
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("blocks", &self.blocks)
            .finish_non_exhaustive()
    }
}

impl BalanceReader for Ledger {
    fn current_height(&self) -> Height {
        self.height()
    }

    fn balance_at(&self, account_id: &str, height: Height) -> LedgerResult<Balance> {
        self.get(account_id, height)
    }
}

/// Report on ledger integrity and validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerIntegrityReport {
    pub height: Height,
    pub block_count: usize,
    pub is_valid: bool,
    pub issues: Vec<String>,
    pub total_supply: i128,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn funded() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.set("Alice", 100).unwrap();
        ledger.set("Bob", 50).unwrap();
        ledger
    }

    #[test]
    fn test_new_ledger_has_empty_genesis() {
        let ledger = Ledger::new();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.height(), 0);
        assert!(ledger.genesis().is_empty());
        assert!(!ledger.is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let ledger = funded();
        assert_eq!(ledger.get("Alice", 0).unwrap(), 100);
        assert_eq!(ledger.get("Bob", 0).unwrap(), 50);
        assert_eq!(ledger.get("Stranger", 0).unwrap(), 0);
    }

    #[test]
    fn test_set_negative_leaves_block_unchanged() {
        let mut ledger = funded();
        let err = ledger.set("Alice", -100).unwrap_err();
        assert_eq!(err, LedgerError::InvalidAmount { amount: -100 });
        assert_eq!(ledger.get("Alice", 0).unwrap(), 100);

        ledger.set("Carol", -1).unwrap_err();
        assert!(!ledger.current_block().contains("Carol"));
    }

    #[test]
    fn test_advance_copies_current_block() {
        let mut ledger = funded();
        assert_eq!(ledger.advance(), 1);
        assert_eq!(ledger.advance(), 2);
        assert_eq!(ledger.len(), 3);
        assert_eq!(
            ledger.block(2).unwrap().balances(),
            ledger.genesis().balances()
        );
    }

    #[test]
    fn test_mutating_current_block_preserves_history() {
        let mut ledger = funded();
        ledger.advance();
        ledger.set("Alice", 70).unwrap();
        ledger.transfer("Bob", "Carol", 20).unwrap();

        assert_eq!(ledger.get("Alice", 0).unwrap(), 100);
        assert_eq!(ledger.get("Bob", 0).unwrap(), 50);
        assert!(!ledger.genesis().contains("Carol"));
        assert_eq!(ledger.get("Alice", 1).unwrap(), 70);
        assert_eq!(ledger.get("Carol", 1).unwrap(), 20);
    }

    #[test]
    fn test_get_future_block() {
        let ledger = funded();
        assert_eq!(
            ledger.get("Alice", 1),
            Err(LedgerError::HeightOutOfRange {
                requested: 1,
                current: 0,
            })
        );
    }

    #[test]
    fn test_transfer() {
        let mut ledger = funded();
        let receipt = ledger.transfer("Alice", "Bob", 25).unwrap();

        assert_eq!(ledger.get("Alice", 0).unwrap(), 75);
        assert_eq!(ledger.get("Bob", 0).unwrap(), 75);
        assert_eq!(receipt.height, 0);
        assert_eq!(receipt.amount, 25);
        assert_eq!(receipt.source_balance, 75);
        assert_eq!(receipt.destination_balance, 75);
    }

    #[test]
    fn test_invalid_transfers_leave_balances_unchanged() {
        let mut ledger = funded();

        assert_eq!(
            ledger.transfer("Alice", "Bob", -25).unwrap_err(),
            LedgerError::InvalidAmount { amount: -25 }
        );
        assert!(matches!(
            ledger.transfer("Alice", "Bob", 101).unwrap_err(),
            LedgerError::InsufficientBalance { requested: 101, .. }
        ));
        assert!(matches!(
            ledger.transfer("Nobody", "Bob", 1).unwrap_err(),
            LedgerError::InsufficientBalance { balance: 0, .. }
        ));

        assert_eq!(ledger.balance("Alice"), 100);
        assert_eq!(ledger.balance("Bob"), 50);
        assert!(!ledger.current_block().contains("Nobody"));
    }

    #[test]
    fn test_self_transfer() {
        let mut ledger = funded();
        ledger.transfer("Alice", "Alice", 100).unwrap();
        assert_eq!(ledger.balance("Alice"), 100);
        assert!(ledger.transfer("Alice", "Alice", 101).is_err());
    }

    #[test]
    fn test_zero_transfer_creates_missing_accounts() {
        let mut ledger = Ledger::new();
        let receipt = ledger.transfer("Ghost", "Nobody", 0).unwrap();

        let block = ledger.current_block();
        assert!(block.contains("Ghost"));
        assert!(block.contains("Nobody"));
        assert_eq!(block.balance_of("Ghost"), 0);
        assert_eq!(block.balance_of("Nobody"), 0);
        assert_eq!(receipt.source_balance, 0);
        assert_eq!(receipt.destination_balance, 0);
    }

    #[test]
    fn test_transfer_overflow_leaves_block_unchanged() {
        let mut ledger = Ledger::new();
        ledger.set("A", 1).unwrap();
        ledger.set("B", Balance::MAX).unwrap();
        let before = ledger.current_block().clone();

        assert_eq!(
            ledger.transfer("A", "B", 1).unwrap_err(),
            LedgerError::BalanceOverflow {
                account: "B".to_string()
            }
        );
        assert_eq!(ledger.current_block(), &before);
    }

    #[test]
    fn test_negative_set_checked_before_validator() {
        struct RejectAll;

        impl LedgerValidator for RejectAll {
            fn validate_set(&self, _account_id: &str, _balance: Balance) -> LedgerResult<()> {
                Err(LedgerError::Validation("no writes".to_string()))
            }

            fn validate_transfer(
                &self,
                _source: &str,
                _destination: &str,
                _amount: Balance,
            ) -> LedgerResult<()> {
                Err(LedgerError::Validation("no writes".to_string()))
            }
        }

        let mut ledger = Ledger::with_validator(Box::new(RejectAll));
        assert_eq!(
            ledger.set("Alice", -5),
            Err(LedgerError::InvalidAmount { amount: -5 })
        );
        assert!(matches!(
            ledger.set("Alice", 5),
            Err(LedgerError::Validation(_))
        ));
        assert!(ledger.current_block().is_empty());
    }

    #[test]
    fn test_blocks_in_height_order() {
        let mut ledger = funded();
        ledger.advance();
        ledger.advance();

        let heights: Vec<Height> = ledger.blocks().map(Block::height).collect();
        assert_eq!(heights, vec![0, 1, 2]);

        let created: Vec<_> = ledger.blocks().map(Block::created_at).collect();
        assert!(created.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_history_and_supply() {
        let mut ledger = funded();
        ledger.advance();
        ledger.set("Alice", 70).unwrap();

        assert_eq!(ledger.history("Alice"), vec![(0, 100), (1, 70)]);
        assert_eq!(ledger.total_supply(0).unwrap(), 150);
        assert_eq!(ledger.total_supply(1).unwrap(), 120);
        assert!(ledger.total_supply(2).is_err());
    }

    #[test]
    fn test_validator_rejection_leaves_block_unchanged() {
        struct NoBob;

        impl LedgerValidator for NoBob {
            fn validate_set(&self, account_id: &str, _balance: Balance) -> LedgerResult<()> {
                if account_id == "Bob" {
                    return Err(LedgerError::Validation("Bob is blocked".to_string()));
                }
                Ok(())
            }

            fn validate_transfer(
                &self,
                _source: &str,
                destination: &str,
                _amount: Balance,
            ) -> LedgerResult<()> {
                self.validate_set(destination, 0)
            }
        }

        let mut ledger = Ledger::with_validator(Box::new(NoBob));
        ledger.set("Alice", 100).unwrap();

        assert!(matches!(
            ledger.set("Bob", 1),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            ledger.transfer("Alice", "Bob", 10),
            Err(LedgerError::Validation(_))
        ));
        assert_eq!(ledger.balance("Alice"), 100);
        assert!(!ledger.current_block().contains("Bob"));
    }

    #[test]
    fn test_validate_integrity() {
        let mut ledger = funded();
        ledger.advance();
        ledger.transfer("Alice", "Bob", 30).unwrap();

        let report = ledger.validate_integrity();
        assert!(report.is_valid, "issues: {:?}", report.issues);
        assert_eq!(report.height, 1);
        assert_eq!(report.block_count, 2);
        assert_eq!(report.total_supply, 150);
    }

    #[test]
    fn test_balance_reader() {
        let mut ledger = funded();
        ledger.advance();
        ledger.set("Alice", 1).unwrap();

        let reader: &dyn BalanceReader = &ledger;
        assert_eq!(reader.current_height(), 1);
        assert_eq!(reader.balance("Alice").unwrap(), 1);
        assert_eq!(reader.balance_at("Alice", 0).unwrap(), 100);
    }
}
