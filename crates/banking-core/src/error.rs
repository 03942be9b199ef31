use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BankingError {
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid amount {amount}: {reason}")]
    InvalidAmount { amount: Decimal, reason: String },

    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Non-converging calculation in {function}: {reason}")]
    NonConverging { function: String, reason: String },

    #[error("Account not found for user '{0}'")]
    AccountNotFound(String),

    #[error("Account already exists for user '{0}'")]
    AccountExists(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl BankingError {
    pub(crate) fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        BankingError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_amount(amount: Decimal, reason: impl Into<String>) -> Self {
        BankingError::InvalidAmount {
            amount,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for BankingError {
    fn from(e: serde_json::Error) -> Self {
        BankingError::SerializationError(e.to_string())
    }
}

#[cfg(feature = "sqlite")]
impl From<rusqlite::Error> for BankingError {
    fn from(e: rusqlite::Error) -> Self {
        BankingError::Storage(e.to_string())
    }
}
