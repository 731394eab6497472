//! Validation utilities

use crate::traits::*;
use crate::types::*;

/// Longest account identifier accepted by [`StrictLedgerValidator`]
pub const MAX_ACCOUNT_ID_LEN: usize = 64;

/// Validate that an amount is strictly positive
pub fn validate_positive_amount(amount: Balance) -> LedgerResult<()> {
    if amount <= 0 {
        Err(LedgerError::Validation(
            "Amount must be positive".to_string(),
        ))
    } else {
        Ok(())
    }
}

/// Validate that an account ID is valid
pub fn validate_account_id(account_id: &str) -> LedgerResult<()> {
    if account_id.trim().is_empty() {
        return Err(LedgerError::Validation(
            "Account ID cannot be empty".to_string(),
        ));
    }

    if account_id.len() > MAX_ACCOUNT_ID_LEN {
        return Err(LedgerError::Validation(format!(
            "Account ID cannot exceed {} characters",
            MAX_ACCOUNT_ID_LEN
        )));
    }

    if !account_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(LedgerError::Validation(
            "Account ID can only contain alphanumeric characters, dashes, and underscores"
                .to_string(),
        ));
    }

    Ok(())
}

/// Validator that checks account identifiers and refuses empty transfers
pub struct StrictLedgerValidator;

impl LedgerValidator for StrictLedgerValidator {
    fn validate_set(&self, account_id: &str, _balance: Balance) -> LedgerResult<()> {
        validate_account_id(account_id)
    }

    fn validate_transfer(
        &self,
        source: &str,
        destination: &str,
        amount: Balance,
    ) -> LedgerResult<()> {
        validate_account_id(source)?;
        validate_account_id(destination)?;
        validate_positive_amount(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Ledger;

    #[test]
    fn test_validate_account_id() {
        assert!(validate_account_id("alice_01").is_ok());
        assert!(validate_account_id("bob-savings").is_ok());
        assert!(validate_account_id("").is_err());
        assert!(validate_account_id("   ").is_err());
        assert!(validate_account_id("alice bob").is_err());
        assert!(validate_account_id("élodie").is_err());
        assert!(validate_account_id(&"a".repeat(MAX_ACCOUNT_ID_LEN)).is_ok());
        assert!(validate_account_id(&"a".repeat(MAX_ACCOUNT_ID_LEN + 1)).is_err());
    }

    #[test]
    fn test_validate_positive_amount() {
        assert!(validate_positive_amount(1).is_ok());
        assert!(validate_positive_amount(0).is_err());
        assert!(validate_positive_amount(-1).is_err());
    }

    #[test]
    fn test_strict_validator_with_ledger() {
        let mut ledger = Ledger::with_validator(Box::new(StrictLedgerValidator));
        ledger.set("alice", 100).unwrap();

        assert!(matches!(
            ledger.set("not valid", 1),
            Err(LedgerError::Validation(_))
        ));
        assert!(matches!(
            ledger.transfer("alice", "bob", 0),
            Err(LedgerError::Validation(_))
        ));

        // Core rules still come first
        assert_eq!(
            ledger.transfer("alice", "bob", -1),
            Err(LedgerError::InvalidAmount { amount: -1 })
        );
        assert_eq!(
            ledger.set("bad id", -1),
            Err(LedgerError::InvalidAmount { amount: -1 })
        );

        ledger.transfer("alice", "bob", 40).unwrap();
        assert_eq!(ledger.balance("alice"), 60);
        assert_eq!(ledger.balance("bob"), 40);
    }
}
