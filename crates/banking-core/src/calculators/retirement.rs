use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::{require_non_negative, require_positive};
use crate::error::BankingError;
use crate::time_value::{
    checked_product, checked_sum, compound, fv_annuity_due, monthly_rate, months_in,
    percent_to_rate, round_money,
};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Years};
use crate::BankingResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Inputs for sizing the corpus needed to fund retirement expenses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementCorpusInput {
    pub current_age: u32,
    pub retirement_age: u32,
    /// Age up to which expenses must be funded.
    #[serde(default = "default_life_expectancy")]
    pub life_expectancy: u32,
    /// Monthly expense in today's money.
    pub monthly_expense: Money,
    pub inflation_pct: Percent,
    /// Return earned on the corpus during retirement.
    pub expected_return_pct: Percent,
}

fn default_life_expectancy() -> u32 {
    85
}

const MAX_AGE: u32 = 120;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementCorpusOutput {
    pub years_to_retirement: u32,
    pub years_in_retirement: u32,
    pub monthly_expense_at_retirement: Money,
    pub annual_expense_at_retirement: Money,
    pub required_corpus: Money,
}

/// Inputs for projecting existing savings plus monthly additions forward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementSavingsInput {
    pub current_savings: Money,
    pub monthly_addition: Money,
    pub annual_return_pct: Percent,
    pub years_to_retirement: Years,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetirementSavingsOutput {
    pub months: u32,
    pub future_value_of_savings: Money,
    pub future_value_of_additions: Money,
    pub total_contributions: Money,
    pub projected_corpus: Money,
}

// ---------------------------------------------------------------------------
// Required corpus
// ---------------------------------------------------------------------------

/// Corpus needed at retirement to pay inflation-adjusted expenses until
/// `life_expectancy`. Each year's expense is withdrawn at the start of the
/// year; the remainder keeps earning `expected_return_pct`.
pub fn calculate_retirement_corpus(
    input: &RetirementCorpusInput,
) -> BankingResult<ComputationOutput<RetirementCorpusOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if input.retirement_age <= input.current_age {
        return Err(BankingError::invalid_input(
            "retirement_age",
            "retirement_age must be greater than current_age",
        ));
    }
    if input.life_expectancy > MAX_AGE {
        return Err(BankingError::invalid_input(
            "life_expectancy",
            format!("life_expectancy cannot exceed {MAX_AGE}"),
        ));
    }
    if input.life_expectancy <= input.retirement_age {
        return Err(BankingError::invalid_input(
            "life_expectancy",
            "life_expectancy must be greater than retirement_age",
        ));
    }
    require_positive("monthly_expense", input.monthly_expense)?;
    require_non_negative("inflation_pct", input.inflation_pct)?;
    if input.expected_return_pct <= dec!(-100) {
        return Err(BankingError::invalid_input(
            "expected_return_pct",
            "expected_return_pct must be greater than -100",
        ));
    }

    let years_to_retirement = input.retirement_age - input.current_age;
    let years_in_retirement = input.life_expectancy - input.retirement_age;
    let inflation = percent_to_rate(input.inflation_pct);
    let expected_return = percent_to_rate(input.expected_return_pct);

    if expected_return < inflation {
        warnings.push(
            "Expected return is below inflation; the corpus shrinks in real terms".into(),
        );
    }

    let monthly_at_retirement = checked_product(
        input.monthly_expense,
        compound(inflation, years_to_retirement)?,
        "monthly_expense",
    )?;
    let annual_at_retirement = checked_product(monthly_at_retirement, dec!(12), "monthly_expense")?;

    // Present value (at retirement) of a growing annuity-due:
    // sum_{k=0}^{N-1} E * ((1+i)/(1+r))^k
    let real_factor = (Decimal::ONE + inflation)
        .checked_div(Decimal::ONE + expected_return)
        .ok_or_else(|| {
            BankingError::invalid_input(
                "expected_return_pct",
                "result exceeds the supported decimal range",
            )
        })?;
    let mut discount = Decimal::ONE;
    let mut corpus = Decimal::ZERO;
    for _ in 0..years_in_retirement {
        let withdrawal = checked_product(annual_at_retirement, discount, "monthly_expense")?;
        corpus = checked_sum(corpus, withdrawal, "monthly_expense")?;
        discount = checked_product(discount, real_factor, "expected_return_pct")?;
    }

    let output = RetirementCorpusOutput {
        years_to_retirement,
        years_in_retirement,
        monthly_expense_at_retirement: round_money(monthly_at_retirement),
        annual_expense_at_retirement: round_money(annual_at_retirement),
        required_corpus: round_money(corpus),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Retirement corpus (inflation-adjusted expenses, growing annuity-due)",
        &serde_json::json!({
            "current_age": input.current_age,
            "retirement_age": input.retirement_age,
            "life_expectancy": input.life_expectancy,
            "inflation_pct": input.inflation_pct.to_string(),
            "expected_return_pct": input.expected_return_pct.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Savings projection
// ---------------------------------------------------------------------------

/// Project current savings and monthly additions to the retirement date with
/// monthly compounding.
pub fn project_retirement_savings(
    input: &RetirementSavingsInput,
) -> BankingResult<ComputationOutput<RetirementSavingsOutput>> {
    let start = Instant::now();

    require_non_negative("current_savings", input.current_savings)?;
    require_non_negative("monthly_addition", input.monthly_addition)?;
    require_non_negative("annual_return_pct", input.annual_return_pct)?;
    require_positive("years_to_retirement", input.years_to_retirement)?;

    let n = months_in("years_to_retirement", input.years_to_retirement)?;
    let rate = monthly_rate(input.annual_return_pct);

    let fv_savings = round_money(checked_product(
        input.current_savings,
        compound(rate, n)?,
        "current_savings",
    )?);
    let fv_additions = round_money(fv_annuity_due(input.monthly_addition, rate, n)?);
    let contributions = checked_sum(
        input.current_savings,
        checked_product(input.monthly_addition, Decimal::from(n), "monthly_addition")?,
        "monthly_addition",
    )?;

    let output = RetirementSavingsOutput {
        months: n,
        future_value_of_savings: fv_savings,
        future_value_of_additions: fv_additions,
        total_contributions: round_money(contributions),
        projected_corpus: checked_sum(fv_savings, fv_additions, "current_savings")?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Retirement savings projection (monthly compounding, contributions at start of month)",
        &serde_json::json!({
            "annual_return_pct": input.annual_return_pct.to_string(),
            "months": n,
        }),
        Vec::new(),
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
    use rust_decimal_macros::dec;

    fn default_input() -> RetirementCorpusInput {
        RetirementCorpusInput {
            current_age: 30,
            retirement_age: 60,
            life_expectancy: 85,
            monthly_expense: dec!(50_000),
            inflation_pct: dec!(6),
            expected_return_pct: dec!(8),
        }
    }

    #[test]
    fn test_no_growth_corpus_is_sum_of_expenses() {
        let mut input = default_input();
        input.inflation_pct = Decimal::ZERO;
        input.expected_return_pct = Decimal::ZERO;
        let out = calculate_retirement_corpus(&input).unwrap().result;

        assert_eq!(out.years_to_retirement, 30);
        assert_eq!(out.years_in_retirement, 25);
        assert_eq!(out.annual_expense_at_retirement, dec!(600_000));
        assert_eq!(out.required_corpus, dec!(15_000_000));
    }

    #[test]
    fn test_return_equal_to_inflation_keeps_real_value() {
        let mut input = default_input();
        input.expected_return_pct = input.inflation_pct;
        let out = calculate_retirement_corpus(&input).unwrap().result;

        let expected = out.annual_expense_at_retirement * dec!(25);
        assert!((out.required_corpus - expected).abs() <= dec!(0.25));
    }

    #[test]
    fn test_expense_inflated_to_retirement() {
        let mut input = default_input();
        input.current_age = 58;
        input.inflation_pct = dec!(10);
        let out = calculate_retirement_corpus(&input).unwrap().result;
        // 50_000 * 1.1^2
        assert_eq!(out.monthly_expense_at_retirement, dec!(60_500));
    }

    #[test]
    fn test_higher_return_needs_smaller_corpus() {
        let low = calculate_retirement_corpus(&default_input()).unwrap().result;
        let mut input = default_input();
        input.expected_return_pct = dec!(10);
        let high = calculate_retirement_corpus(&input).unwrap().result;
        assert!(high.required_corpus < low.required_corpus);
    }

    #[test]
    fn test_return_below_inflation_warns() {
        let mut input = default_input();
        input.expected_return_pct = dec!(3);
        let out = calculate_retirement_corpus(&input).unwrap();
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_validation_retirement_not_after_current_age() {
        let mut input = default_input();
        input.retirement_age = 30;
        assert!(calculate_retirement_corpus(&input).is_err());
    }

    #[test]
    fn test_validation_life_expectancy() {
        let mut input = default_input();
        input.life_expectancy = 60;
        assert!(calculate_retirement_corpus(&input).is_err());
        input.life_expectancy = u32::MAX;
        let err = calculate_retirement_corpus(&input).unwrap_err();
        assert!(matches!(err, BankingError::InvalidInput { ref field, .. } if field == "life_expectancy"));
    }

    #[test]
    fn test_overflow_is_invalid_input() {
        let mut input = default_input();
        input.monthly_expense = Decimal::MAX;
        let err = calculate_retirement_corpus(&input).unwrap_err();
        assert!(matches!(err, BankingError::InvalidInput { .. }));

        let err = project_retirement_savings(&RetirementSavingsInput {
            current_savings: Decimal::MAX,
            monthly_addition: dec!(1_000),
            annual_return_pct: Decimal::ZERO,
            years_to_retirement: dec!(1),
        })
        .unwrap_err();
        assert!(matches!(err, BankingError::InvalidInput { .. }));
    }

    #[test]
    fn test_savings_projection_zero_return() {
        let out = project_retirement_savings(&RetirementSavingsInput {
            current_savings: dec!(100_000),
            monthly_addition: dec!(1_000),
            annual_return_pct: Decimal::ZERO,
            years_to_retirement: dec!(10),
        })
        .unwrap()
        .result;
        assert_eq!(out.months, 120);
        assert_eq!(out.projected_corpus, dec!(220_000));
        assert_eq!(out.total_contributions, dec!(220_000));
    }

    #[test]
    fn test_savings_projection_grows_with_return() {
        let out = project_retirement_savings(&RetirementSavingsInput {
            current_savings: dec!(100_000),
            monthly_addition: dec!(1_000),
            annual_return_pct: dec!(12),
            years_to_retirement: dec!(1),
        })
        .unwrap()
        .result;
        // 100_000 * 1.01^12 = 112_682.50; additions = 12_809.33
        assert_eq!(out.future_value_of_savings, dec!(112_682.50));
        assert_eq!(out.future_value_of_additions, dec!(12_809.33));
        assert_eq!(out.projected_corpus, dec!(125_491.83));
    }
}
