//! Stateless personal-finance calculators.
//!
//! Each calculator takes a typed `*Input`, validates it, and returns a
//! `ComputationOutput` whose `result` holds monetary values rounded to cents.

pub mod budget;
pub mod credit_card;
pub mod deposits;
pub mod emi;
pub mod home_loan;
pub mod income_tax;
pub mod net_worth;
pub mod retirement;

use rust_decimal::Decimal;

use crate::error::BankingError;
use crate::BankingResult;

pub(crate) fn require_positive(field: &str, value: Decimal) -> BankingResult<()> {
    if value <= Decimal::ZERO {
        return Err(BankingError::invalid_input(field, format!("{field} must be > 0")));
    }
    Ok(())
}

pub(crate) fn require_non_negative(field: &str, value: Decimal) -> BankingResult<()> {
    if value < Decimal::ZERO {
        return Err(BankingError::invalid_input(
            field,
            format!("{field} cannot be negative"),
        ));
    }
    Ok(())
}
