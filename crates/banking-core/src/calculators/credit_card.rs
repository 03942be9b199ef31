use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{require_non_negative, require_positive};
use crate::error::BankingError;
use crate::time_value::{
    checked_product, checked_sum, monthly_rate, percent_to_rate, require_months, round_money,
    MAX_TENURE_MONTHS,
};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::BankingResult;

/// Longest payoff horizon simulated before giving up (100 years).
const MAX_PAYOFF_MONTHS: u32 = MAX_TENURE_MONTHS;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardPayoffInput {
    pub balance: Money,
    pub annual_rate_pct: Percent,
    pub monthly_payment: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardPayoffOutput {
    pub months_to_payoff: u32,
    pub total_interest: Money,
    pub total_paid: Money,
    pub final_payment: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimumPaymentInput {
    pub current_balance: Money,
    /// Interest charged per month, in percent.
    pub monthly_interest_pct: Percent,
    /// Minimum payment as a percentage of the post-interest balance.
    pub minimum_payment_pct: Percent,
    pub months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinimumPaymentOutput {
    pub remaining_balance: Money,
    pub total_interest: Money,
    pub total_paid: Money,
}

// ---------------------------------------------------------------------------
// Payoff under a fixed payment
// ---------------------------------------------------------------------------

/// Months needed to clear a card balance with a fixed monthly payment.
///
/// Each month interest accrues on the outstanding balance (rounded to cents),
/// then the payment is applied. Fails when the payment cannot outpace the
/// interest.
pub fn calculate_card_payoff(
    input: &CardPayoffInput,
) -> BankingResult<ComputationOutput<CardPayoffOutput>> {
    let start = Instant::now();

    require_non_negative("balance", input.balance)?;
    require_non_negative("annual_rate_pct", input.annual_rate_pct)?;
    require_positive("monthly_payment", input.monthly_payment)?;

    let rate = monthly_rate(input.annual_rate_pct);
    let mut balance = round_money(input.balance);

    let first_interest = round_money(checked_product(balance, rate, "balance")?);
    if balance > Decimal::ZERO && input.monthly_payment <= first_interest {
        return Err(BankingError::NonConverging {
            function: "credit_card_payoff".into(),
            reason: format!(
                "monthly payment {} does not exceed the monthly interest {}",
                input.monthly_payment, first_interest
            ),
        });
    }

    let mut months = 0u32;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;
    let mut final_payment = Decimal::ZERO;

    while balance > Decimal::ZERO {
        if months == MAX_PAYOFF_MONTHS {
            return Err(BankingError::NonConverging {
                function: "credit_card_payoff".into(),
                reason: format!("balance not cleared within {MAX_PAYOFF_MONTHS} months"),
            });
        }
        let interest = round_money(checked_product(balance, rate, "balance")?);
        balance = checked_sum(balance, interest, "balance")?;
        let payment = input.monthly_payment.min(balance);
        balance -= payment;

        months += 1;
        total_interest = checked_sum(total_interest, interest, "balance")?;
        total_paid = checked_sum(total_paid, payment, "balance")?;
        final_payment = payment;
    }

    let output = CardPayoffOutput {
        months_to_payoff: months,
        total_interest,
        total_paid,
        final_payment,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Credit card payoff (monthly simulation, fixed payment)",
        &serde_json::json!({
            "balance": input.balance.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "monthly_payment": input.monthly_payment.to_string(),
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Minimum-payment projection
// ---------------------------------------------------------------------------

/// Balance left after `months` of paying only a percentage minimum.
pub fn project_minimum_payments(
    input: &MinimumPaymentInput,
) -> BankingResult<ComputationOutput<MinimumPaymentOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_non_negative("current_balance", input.current_balance)?;
    require_non_negative("monthly_interest_pct", input.monthly_interest_pct)?;
    require_non_negative("minimum_payment_pct", input.minimum_payment_pct)?;
    require_months("months", input.months)?;

    let rate = percent_to_rate(input.monthly_interest_pct);
    let min_share = percent_to_rate(input.minimum_payment_pct);

    let mut balance = input.current_balance;
    let mut total_interest = Decimal::ZERO;
    let mut total_paid = Decimal::ZERO;

    for _ in 0..input.months {
        let interest = checked_product(balance, rate, "current_balance")?;
        balance = checked_sum(balance, interest, "current_balance")?;
        let payment = checked_product(balance, min_share, "current_balance")?.min(balance);
        balance -= payment;
        total_interest = checked_sum(total_interest, interest, "current_balance")?;
        total_paid = checked_sum(total_paid, payment, "current_balance")?;
    }

    let remaining = round_money(balance);
    if remaining > round_money(input.current_balance) {
        warnings.push("Minimum payments do not cover interest; the balance is growing".into());
    }

    let output = MinimumPaymentOutput {
        remaining_balance: remaining,
        total_interest: round_money(total_interest),
        total_paid: round_money(total_paid),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Credit card minimum-payment projection (interest then percentage payment)",
        &serde_json::json!({
            "monthly_interest_pct": input.monthly_interest_pct.to_string(),
            "minimum_payment_pct": input.minimum_payment_pct.to_string(),
            "months": input.months,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
