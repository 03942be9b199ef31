use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{require_non_negative, require_positive};
use crate::error::BankingError;
use crate::time_value::{monthly_rate, months_in, pv_annuity, round_money, truncate_money};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate, Years};
use crate::BankingResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeLoanEligibilityInput {
    pub monthly_income: Money,
    #[serde(default)]
    pub existing_emi: Money,
    pub tenure_years: Years,
    pub interest_rate_pct: Percent,
    /// Share of monthly income lenders allow for all EMIs (0.5 = 50%).
    #[serde(default = "default_max_emi_ratio")]
    pub max_emi_ratio: Rate,
    /// Optional monthly living expenses; when given, the new EMI must also fit
    /// in what is left after expenses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_expenses: Option<Money>,
}

fn default_max_emi_ratio() -> Rate {
    dec!(0.5)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeLoanEligibilityOutput {
    /// Ceiling on all EMIs combined: max_emi_ratio * monthly_income.
    pub max_emi_allowed: Money,
    /// EMI left for the new loan after existing obligations.
    pub available_emi: Money,
    pub tenure_months: u32,
    pub eligible_loan_amount: Money,
    /// Which limit bound the available EMI: "income_ratio" or "disposable_income".
    pub binding_constraint: String,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Largest principal whose EMI, added to existing EMIs, stays within the
/// lender's share of monthly income.
pub fn calculate_home_loan_eligibility(
    input: &HomeLoanEligibilityInput,
) -> BankingResult<ComputationOutput<HomeLoanEligibilityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_non_negative("monthly_income", input.monthly_income)?;
    require_non_negative("existing_emi", input.existing_emi)?;
    require_positive("tenure_years", input.tenure_years)?;
    require_non_negative("interest_rate_pct", input.interest_rate_pct)?;
    if input.max_emi_ratio <= Decimal::ZERO || input.max_emi_ratio > Decimal::ONE {
        return Err(BankingError::invalid_input(
            "max_emi_ratio",
            "max_emi_ratio must be in (0, 1]",
        ));
    }
    if let Some(expenses) = input.monthly_expenses {
        require_non_negative("monthly_expenses", expenses)?;
    }

    let n = months_in("tenure_years", input.tenure_years)?;
    if n == 0 {
        return Err(BankingError::invalid_input(
            "tenure_years",
            "tenure must cover at least one month",
        ));
    }

    let max_emi = input.max_emi_ratio * input.monthly_income;
    let by_ratio = max_emi - input.existing_emi;

    let (mut available, mut binding) = (by_ratio, "income_ratio");
    if let Some(expenses) = input.monthly_expenses {
        let by_disposable = (input.monthly_income - expenses)
            .checked_sub(input.existing_emi)
            .ok_or_else(|| {
                BankingError::invalid_input("monthly_expenses", "monthly_expenses is out of range")
            })?;
        if by_disposable < available {
            available = by_disposable;
            binding = "disposable_income";
        }
    }

    if available <= Decimal::ZERO {
        warnings.push("Existing obligations already use the full EMI allowance".into());
        available = Decimal::ZERO;
    }

    let rate = monthly_rate(input.interest_rate_pct);
    // Truncate rather than round so the EMI on the quoted amount never exceeds
    // the allowance.
    let loan = truncate_money(pv_annuity(available, rate, n)?);

    let output = HomeLoanEligibilityOutput {
        max_emi_allowed: round_money(max_emi),
        available_emi: truncate_money(available),
        tenure_months: n,
        eligible_loan_amount: loan,
        binding_constraint: binding.to_string(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Home loan eligibility (EMI affordability, inverted amortization)",
        &serde_json::json!({
            "monthly_income": input.monthly_income.to_string(),
            "existing_emi": input.existing_emi.to_string(),
            "interest_rate_pct": input.interest_rate_pct.to_string(),
            "max_emi_ratio": input.max_emi_ratio.to_string(),
            "tenure_months": n,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_value::level_payment;
    use rust_decimal_macros::dec;

    fn default_input() -> HomeLoanEligibilityInput {
        HomeLoanEligibilityInput {
            monthly_income: dec!(100_000),
            existing_emi: dec!(10_000),
            tenure_years: dec!(20),
            interest_rate_pct: dec!(9),
            max_emi_ratio: dec!(0.5),
            monthly_expenses: None,
        }
    }

    #[test]
    fn test_emi_on_eligible_amount_respects_cap() {
        let input = default_input();
        let out = calculate_home_loan_eligibility(&input).unwrap().result;

        assert_eq!(out.max_emi_allowed, dec!(50_000));
        assert_eq!(out.available_emi, dec!(40_000));

        let new_emi = level_payment(out.eligible_loan_amount, monthly_rate(dec!(9)), 240).unwrap();
        assert!(new_emi + input.existing_emi <= dec!(50_000));
        // And the amount is not needlessly conservative.
        assert!(new_emi > dec!(39_999.99));
    }

    #[test]
    fn test_zero_rate_is_emi_times_months() {
        let mut input = default_input();
        input.interest_rate_pct = Decimal::ZERO;
        let out = calculate_home_loan_eligibility(&input).unwrap().result;
        assert_eq!(out.eligible_loan_amount, dec!(9_600_000));
    }

    #[test]
    fn test_existing_emi_above_allowance_gives_zero() {
        let mut input = default_input();
        input.existing_emi = dec!(60_000);
        let out = calculate_home_loan_eligibility(&input).unwrap();
        assert_eq!(out.result.eligible_loan_amount, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_expenses_can_bind() {
        let mut input = default_input();
        input.monthly_expenses = Some(dec!(70_000));
        let out = calculate_home_loan_eligibility(&input).unwrap().result;
        assert_eq!(out.available_emi, dec!(20_000));
        assert_eq!(out.binding_constraint, "disposable_income");
    }

    #[test]
    fn test_invalid_ratio() {
        let mut input = default_input();
        input.max_emi_ratio = dec!(1.5);
        assert!(calculate_home_loan_eligibility(&input).is_err());
    }

    #[test]
    fn test_extreme_inputs_are_invalid_input() {
        let mut input = default_input();
        input.tenure_years = dec!(1_000_000);
        let err = calculate_home_loan_eligibility(&input).unwrap_err();
        assert!(matches!(err, BankingError::InvalidInput { ref field, .. } if field == "tenure_years"));

        let mut input = default_input();
        input.existing_emi = Decimal::MAX;
        input.monthly_expenses = Some(Decimal::MAX);
        let err = calculate_home_loan_eligibility(&input).unwrap_err();
        assert!(matches!(err, BankingError::InvalidInput { .. }));
    }
}
