//! Account domain model.
//!
//! # Responsibility
//! - Define the persisted account record.
//! - Validate owner and currency values before they reach storage.
//!
//! # Invariants
//! - `id` and `created_at` are assigned by the store, never by callers.
//! - `owner`, `currency` and `created_at` never change after creation.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned account identifier.
///
/// Monotonically increasing and never reused, including after deletion.
pub type AccountId = i64;

/// Required length of a currency code.
pub const CURRENCY_CODE_LEN: usize = 3;

/// Persisted bank account record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    /// Account holder name.
    pub owner: String,
    /// Amount in minor currency units. May be negative.
    pub balance: i64,
    /// Three-letter uppercase code, e.g. `USD`.
    pub currency: String,
    /// Unix epoch milliseconds, set once at insert.
    pub created_at: i64,
}

impl Account {
    /// Checks the caller-controlled fields of this record.
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        validate_owner(&self.owner)?;
        validate_currency(&self.currency)
    }
}

/// Field-level validation failure for account input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyOwner,
    InvalidCurrency(String),
}

impl Display for AccountValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyOwner => write!(f, "account owner cannot be empty"),
            Self::InvalidCurrency(value) => write!(
                f,
                "invalid currency `{value}`; expected {CURRENCY_CODE_LEN} uppercase ASCII letters"
            ),
        }
    }
}

impl Error for AccountValidationError {}

/// Rejects blank owner names.
pub fn validate_owner(owner: &str) -> Result<(), AccountValidationError> {
    if owner.trim().is_empty() {
        return Err(AccountValidationError::EmptyOwner);
    }
    Ok(())
}

/// Accepts exactly three uppercase ASCII letters.
pub fn validate_currency(currency: &str) -> Result<(), AccountValidationError> {
    let well_formed = currency.len() == CURRENCY_CODE_LEN
        && currency.bytes().all(|byte| byte.is_ascii_uppercase());
    if !well_formed {
        return Err(AccountValidationError::InvalidCurrency(currency.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{validate_currency, validate_owner, Account, AccountValidationError};

    fn sample() -> Account {
        Account {
            id: 1,
            owner: "alice".to_string(),
            balance: 100,
            currency: "USD".to_string(),
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn owner_must_not_be_blank() {
        assert_eq!(validate_owner("  "), Err(AccountValidationError::EmptyOwner));
        assert!(validate_owner("bob").is_ok());
    }

    #[test]
    fn currency_requires_three_uppercase_letters() {
        for bad in ["", "usd", "US", "USDT", "U1D", "ÜSD"] {
            assert!(
                matches!(
                    validate_currency(bad),
                    Err(AccountValidationError::InvalidCurrency(_))
                ),
                "`{bad}` should be rejected"
            );
        }
        assert!(validate_currency("EUR").is_ok());
    }

    #[test]
    fn validate_checks_owner_and_currency() {
        assert!(sample().validate().is_ok());

        let mut account = sample();
        account.currency = "us".to_string();
        assert!(account.validate().is_err());
    }

    #[test]
    fn negative_balance_is_allowed() {
        let mut account = sample();
        account.balance = -50;
        assert!(account.validate().is_ok());
    }
}
