use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use banking_core::calculators::credit_card::{self, CardPayoffInput, MinimumPaymentInput};
use banking_core::calculators::emi::{self, EmiInput};
use banking_core::calculators::home_loan::{self, HomeLoanEligibilityInput};

use crate::input;

/// Arguments for the EMI calculation
#[derive(Args)]
pub struct EmiArgs {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 8.5)
    #[arg(long, alias = "rate")]
    pub annual_rate_pct: Option<Decimal>,

    /// Tenure in months
    #[arg(long, alias = "months")]
    pub tenure_months: Option<u32>,

    /// Include the month-by-month amortization schedule
    #[arg(long)]
    pub schedule: bool,
}

/// Arguments for home loan eligibility
#[derive(Args)]
pub struct HomeLoanArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Gross monthly income
    #[arg(long)]
    pub monthly_income: Option<Decimal>,

    /// EMIs already being paid each month
    #[arg(long, default_value = "0")]
    pub existing_emi: Decimal,

    /// Loan tenure in years
    #[arg(long)]
    pub tenure_years: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "rate")]
    pub interest_rate_pct: Option<Decimal>,

    /// Maximum share of income for all EMIs, as a fraction (default 0.5)
    #[arg(long)]
    pub max_emi_ratio: Option<Decimal>,

    /// Monthly living expenses; caps the EMI at disposable income
    #[arg(long)]
    pub monthly_expenses: Option<Decimal>,
}

/// Arguments for credit card payoff with a fixed payment
#[derive(Args)]
pub struct CardPayoffArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Outstanding balance
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "rate")]
    pub annual_rate_pct: Option<Decimal>,

    /// Fixed monthly payment
    #[arg(long)]
    pub monthly_payment: Option<Decimal>,
}

/// Arguments for a minimum-payment projection
#[derive(Args)]
pub struct CardMinimumArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Current card balance
    #[arg(long)]
    pub current_balance: Option<Decimal>,

    /// Monthly interest in percent (e.g. 3.5)
    #[arg(long)]
    pub monthly_interest_pct: Option<Decimal>,

    /// Minimum payment as a percent of the balance
    #[arg(long, default_value = "5")]
    pub minimum_payment_pct: Decimal,

    /// Months to project
    #[arg(long, default_value = "12")]
    pub months: u32,
}

pub fn run_emi(args: EmiArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let emi_input: EmiInput = input::resolve(args.input.as_deref(), || {
        Ok(EmiInput {
            principal: args.principal.ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: args
                .annual_rate_pct
                .ok_or("--annual-rate-pct is required (or provide --input)")?,
            tenure_months: args
                .tenure_months
                .ok_or("--tenure-months is required (or provide --input)")?,
            include_schedule: args.schedule,
        })
    })?;

    let result = emi::calculate_emi(&emi_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_home_loan(args: HomeLoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: HomeLoanEligibilityInput = input::resolve(args.input.as_deref(), || {
        Ok(HomeLoanEligibilityInput {
            monthly_income: args
                .monthly_income
                .ok_or("--monthly-income is required (or provide --input)")?,
            existing_emi: args.existing_emi,
            tenure_years: args
                .tenure_years
                .ok_or("--tenure-years is required (or provide --input)")?,
            interest_rate_pct: args
                .interest_rate_pct
                .ok_or("--interest-rate-pct is required (or provide --input)")?,
            max_emi_ratio: args.max_emi_ratio.unwrap_or(dec!(0.5)),
            monthly_expenses: args.monthly_expenses,
        })
    })?;

    let result = home_loan::calculate_home_loan_eligibility(&loan_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_card_payoff(args: CardPayoffArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let card_input: CardPayoffInput = input::resolve(args.input.as_deref(), || {
        Ok(CardPayoffInput {
            balance: args.balance.ok_or("--balance is required (or provide --input)")?,
            annual_rate_pct: args
                .annual_rate_pct
                .ok_or("--annual-rate-pct is required (or provide --input)")?,
            monthly_payment: args
                .monthly_payment
                .ok_or("--monthly-payment is required (or provide --input)")?,
        })
    })?;

    let result = credit_card::calculate_card_payoff(&card_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_card_minimum(args: CardMinimumArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let card_input: MinimumPaymentInput = input::resolve(args.input.as_deref(), || {
        Ok(MinimumPaymentInput {
            current_balance: args
                .current_balance
                .ok_or("--current-balance is required (or provide --input)")?,
            monthly_interest_pct: args
                .monthly_interest_pct
                .ok_or("--monthly-interest-pct is required (or provide --input)")?,
            minimum_payment_pct: args.minimum_payment_pct,
            months: args.months,
        })
    })?;

    if card_input.minimum_payment_pct.is_zero() {
        tracing::warn!("Minimum payment of 0% never reduces the balance");
    }
    let result = credit_card::project_minimum_payments(&card_input)?;
    Ok(serde_json::to_value(result)?)
}
