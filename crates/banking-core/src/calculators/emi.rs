use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{require_non_negative, require_positive};
use crate::time_value::{
    checked_product, checked_sum, level_payment, monthly_rate, require_months, round_money,
};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::BankingResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiInput {
    pub principal: Money,
    pub annual_rate_pct: Percent,
    pub tenure_months: u32,
    /// Also return the month-by-month amortization table.
    #[serde(default)]
    pub include_schedule: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiOutput {
    pub monthly_installment: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule: Option<Vec<AmortizationRow>>,
}

/// One month of the amortization table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    pub month: u32,
    pub opening_balance: Money,
    pub installment: Money,
    pub interest: Money,
    pub principal: Money,
    pub closing_balance: Money,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Equated monthly installment for a fully amortising loan.
pub fn calculate_emi(input: &EmiInput) -> BankingResult<ComputationOutput<EmiOutput>> {
    let start = Instant::now();

    require_positive("principal", input.principal)?;
    require_non_negative("annual_rate_pct", input.annual_rate_pct)?;
    let n = require_months("tenure_months", input.tenure_months)?;

    let rate = monthly_rate(input.annual_rate_pct);
    let installment = round_money(level_payment(input.principal, rate, n)?);
    let principal = round_money(input.principal);

    // Totals follow the quoted installment. When rounding it down leaves a
    // few cents of principal, the final installment covers them.
    let total_payment = checked_product(installment, Decimal::from(n), "principal")?.max(principal);
    let total_interest = total_payment - principal;

    let schedule = if input.include_schedule {
        Some(amortization_schedule(principal, rate, n, installment)?)
    } else {
        None
    };

    let output = EmiOutput {
        monthly_installment: installment,
        total_interest,
        total_payment,
        schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "EMI (reducing-balance amortization, monthly compounding)",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_pct": input.annual_rate_pct.to_string(),
            "tenure_months": input.tenure_months,
        }),
        Vec::new(),
        elapsed,
        output,
    ))
}

/// Month-by-month split of each installment into interest and principal.
/// Interest is rounded to cents each month; the last installment absorbs the
/// accumulated rounding so the loan closes at exactly zero.
fn amortization_schedule(
    principal: Money,
    rate: Decimal,
    n: u32,
    installment: Money,
) -> BankingResult<Vec<AmortizationRow>> {
    let mut rows = Vec::with_capacity(n as usize);
    let mut balance = principal;

    for month in 1..=n {
        let opening = balance;
        let interest = round_money(checked_product(opening, rate, "principal")?);
        let due = checked_sum(opening, interest, "principal")?;
        let payment = if month == n { due } else { installment.min(due) };
        let principal_part = payment - interest;
        balance = opening - principal_part;

        rows.push(AmortizationRow {
            month,
            opening_balance: opening,
            installment: payment,
            interest,
            principal: principal_part,
            closing_balance: balance,
        });
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
