pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "calculators")]
pub mod calculators;

#[cfg(feature = "estimator")]
pub mod loan_estimator;

#[cfg(feature = "ledger")]
pub mod ledger;

pub use error::BankingError;
pub use types::*;

/// Standard result type for all banking operations
pub type BankingResult<T> = Result<T, BankingError>;
