use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

use super::require_non_negative;
use crate::error::BankingError;
use crate::time_value::{checked_total, percent_to_rate, round_money};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::BankingResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetPlanInput {
    pub monthly_income: Money,
    /// Category name -> share of income in percent.
    pub allocations: BTreeMap<String, Percent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryAllocation {
    pub category: String,
    pub percent: Percent,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetPlanOutput {
    pub allocations: Vec<CategoryAllocation>,
    pub allocated_percent: Percent,
    pub allocated_total: Money,
    pub unallocated_percent: Percent,
    pub unallocated_amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsAdviceInput {
    pub monthly_income: Money,
    pub monthly_expenses: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsAdviceOutput {
    pub savings_target: Money,
    pub recommended_savings_pct: Percent,
    pub surplus_or_deficit: Money,
}

// ---------------------------------------------------------------------------
// Budget plan
// ---------------------------------------------------------------------------

/// Split monthly income into category amounts from percentage allocations.
pub fn plan_budget(input: &BudgetPlanInput) -> BankingResult<ComputationOutput<BudgetPlanOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_non_negative("monthly_income", input.monthly_income)?;

    for (category, pct) in &input.allocations {
        if *pct < Decimal::ZERO {
            return Err(BankingError::invalid_input(
                "allocations",
                format!("allocation for '{category}' cannot be negative"),
            ));
        }
    }

    let allocated_percent = checked_total(input.allocations.values().copied(), "allocations")?;
    if allocated_percent > dec!(100) {
        return Err(BankingError::invalid_input(
            "allocations",
            format!("allocations sum to {allocated_percent}%, which exceeds 100%"),
        ));
    }

    let allocations: Vec<CategoryAllocation> = input
        .allocations
        .iter()
        .map(|(category, pct)| CategoryAllocation {
            category: category.clone(),
            percent: *pct,
            amount: round_money(input.monthly_income * percent_to_rate(*pct)),
        })
        .collect();

    let allocated_total = checked_total(allocations.iter().map(|a| a.amount), "monthly_income")?;
    let unallocated_percent = dec!(100) - allocated_percent;
    if unallocated_percent > Decimal::ZERO {
        warnings.push(format!("{unallocated_percent}% of income is unallocated"));
    }

    let output = BudgetPlanOutput {
        allocations,
        allocated_percent,
        allocated_total,
        unallocated_percent,
        unallocated_amount: round_money(input.monthly_income) - allocated_total,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Budget plan (percentage allocation of monthly income)",
        &serde_json::json!({
            "monthly_income": input.monthly_income.to_string(),
            "categories": input.allocations.len(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Savings advice
// ---------------------------------------------------------------------------

/// Savings recommendation from the expense ratio: spend <= 70% of income ->
/// save 20%; <= 90% -> save 10%; otherwise trim expenses first.
pub fn recommend_savings(
    input: &SavingsAdviceInput,
) -> BankingResult<ComputationOutput<SavingsAdviceOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    require_non_negative("monthly_income", input.monthly_income)?;
    require_non_negative("monthly_expenses", input.monthly_expenses)?;

    let recommended = if input.monthly_income.is_zero() {
        Decimal::ZERO
    } else {
        // Compare against shares of income rather than dividing, which can
        // overflow for a tiny income.
        if input.monthly_expenses <= input.monthly_income * dec!(0.7) {
            dec!(20)
        } else if input.monthly_expenses <= input.monthly_income * dec!(0.9) {
            dec!(10)
        } else {
            warnings.push("Expenses exceed 90% of income; reduce spending before saving".into());
            Decimal::ZERO
        }
    };

    let output = SavingsAdviceOutput {
        savings_target: round_money(input.monthly_income * percent_to_rate(recommended)),
        recommended_savings_pct: recommended,
        surplus_or_deficit: round_money(input.monthly_income - input.monthly_expenses),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Savings recommendation (expense-ratio tiers 70% / 90%)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
