use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

use banking_core::calculators::budget::{self, BudgetPlanInput, SavingsAdviceInput};
use banking_core::calculators::income_tax::{
    self, IncomeTaxInput, TaxRegime, TaxableIncomeInput,
};
use banking_core::calculators::net_worth::{self, NetWorthInput};

use crate::input;

/// Built-in tax regimes selectable from the command line. Custom slab tables
/// are only accepted through `--input`.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RegimeArg {
    New,
    Old,
}

impl From<RegimeArg> for TaxRegime {
    fn from(r: RegimeArg) -> Self {
        match r {
            RegimeArg::New => TaxRegime::New,
            RegimeArg::Old => TaxRegime::Old,
        }
    }
}

/// Arguments for slab-based income tax
#[derive(Args)]
pub struct IncomeTaxArgs {
    /// Path to JSON/YAML input file (required for custom slab tables)
    #[arg(long)]
    pub input: Option<String>,

    /// Annual gross income
    #[arg(long)]
    pub gross_income: Option<Decimal>,

    /// Claimed deductions on top of the standard deduction
    #[arg(long, default_value = "0")]
    pub deductions: Decimal,

    /// Tax regime
    #[arg(long, value_enum, default_value = "new")]
    pub regime: RegimeArg,
}

/// Arguments for taxable income
#[derive(Args)]
pub struct TaxableIncomeArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Annual gross income
    #[arg(long)]
    pub gross_income_yearly: Option<Decimal>,

    #[arg(long, default_value = "50000")]
    pub standard_deduction: Decimal,

    #[arg(long, default_value = "0")]
    pub other_deductions: Decimal,
}

/// Arguments for a percentage budget plan
#[derive(Args)]
pub struct BudgetArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly income to split
    #[arg(long)]
    pub monthly_income: Option<Decimal>,

    /// Category share as NAME=PERCENT (repeatable, e.g. --allocation rent=30)
    #[arg(long = "allocation", value_parser = parse_entry)]
    pub allocations: Vec<(String, Decimal)>,
}

/// Arguments for the savings recommendation
#[derive(Args)]
pub struct SavingsAdviceArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub monthly_income: Option<Decimal>,

    #[arg(long)]
    pub monthly_expenses: Option<Decimal>,
}

/// Arguments for net worth
#[derive(Args)]
pub struct NetWorthArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Asset as NAME=VALUE (repeatable)
    #[arg(long = "asset", value_parser = parse_entry)]
    pub assets: Vec<(String, Decimal)>,

    /// Liability as NAME=VALUE (repeatable)
    #[arg(long = "liability", value_parser = parse_entry)]
    pub liabilities: Vec<(String, Decimal)>,
}

/// Parse `name=amount`.
pub fn parse_entry(raw: &str) -> Result<(String, Decimal), String> {
    let (name, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing name in '{raw}'"));
    }
    let amount = Decimal::from_str(amount.trim())
        .map_err(|e| format!("invalid amount in '{raw}': {e}"))?;
    Ok((name.to_string(), amount))
}

fn into_book(entries: &[(String, Decimal)]) -> Result<BTreeMap<String, Decimal>, String> {
    let mut book = BTreeMap::new();
    for (name, amount) in entries {
        if book.insert(name.clone(), *amount).is_some() {
            return Err(format!("'{name}' given more than once"));
        }
    }
    Ok(book)
}

pub fn run_income_tax(args: IncomeTaxArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let tax_input: IncomeTaxInput = input::resolve(args.input.as_deref(), || {
        Ok(IncomeTaxInput {
            gross_income: args
                .gross_income
                .ok_or("--gross-income is required (or provide --input)")?,
            deductions: args.deductions,
            regime: args.regime.into(),
        })
    })?;

    let result = income_tax::calculate_income_tax(&tax_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_taxable_income(args: TaxableIncomeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let taxable_input: TaxableIncomeInput = input::resolve(args.input.as_deref(), || {
        Ok(TaxableIncomeInput {
            gross_income_yearly: args
                .gross_income_yearly
                .ok_or("--gross-income-yearly is required (or provide --input)")?,
            standard_deduction: args.standard_deduction,
            other_deductions: args.other_deductions,
        })
    })?;

    let result = income_tax::calculate_taxable_income(&taxable_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_budget(args: BudgetArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let budget_input: BudgetPlanInput = input::resolve(args.input.as_deref(), || {
        if args.allocations.is_empty() {
            return Err("at least one --allocation is required (or provide --input)".into());
        }
        Ok(BudgetPlanInput {
            monthly_income: args
                .monthly_income
                .ok_or("--monthly-income is required (or provide --input)")?,
            allocations: into_book(&args.allocations)?,
        })
    })?;

    let result = budget::plan_budget(&budget_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_savings_advice(args: SavingsAdviceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let advice_input: SavingsAdviceInput = input::resolve(args.input.as_deref(), || {
        Ok(SavingsAdviceInput {
            monthly_income: args
                .monthly_income
                .ok_or("--monthly-income is required (or provide --input)")?,
            monthly_expenses: args
                .monthly_expenses
                .ok_or("--monthly-expenses is required (or provide --input)")?,
        })
    })?;

    let result = budget::recommend_savings(&advice_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_net_worth(args: NetWorthArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let worth_input: NetWorthInput = input::resolve(args.input.as_deref(), || {
        Ok(NetWorthInput {
            assets: into_book(&args.assets)?,
            liabilities: into_book(&args.liabilities)?,
        })
    })?;

    let result = net_worth::calculate_net_worth(&worth_input)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_entry() {
        assert_eq!(
            parse_entry("home loan = 2500000.50").unwrap(),
            ("home loan".to_string(), dec!(2_500_000.50))
        );
        assert!(parse_entry("rent").is_err());
        assert!(parse_entry("=10").is_err());
        assert!(parse_entry("rent=ten").is_err());
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let entries = vec![("cash".to_string(), dec!(1)), ("cash".to_string(), dec!(2))];
        assert!(into_book(&entries).is_err());
    }
}
