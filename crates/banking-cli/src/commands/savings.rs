use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use banking_core::calculators::deposits::{self, FdInput, RdInput, SipInput};
use banking_core::calculators::retirement::{
    self, RetirementCorpusInput, RetirementSavingsInput,
};

use crate::input;

/// Arguments for a monthly SIP projection
#[derive(Args)]
pub struct SipArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Amount invested at the start of each month
    #[arg(long)]
    pub monthly_investment: Option<Decimal>,

    /// Expected annual return in percent
    #[arg(long, alias = "rate")]
    pub annual_rate_pct: Option<Decimal>,

    /// Investment horizon in years (fractions allowed)
    #[arg(long, alias = "years")]
    pub tenure_years: Option<Decimal>,
}

/// Arguments for a fixed deposit
#[derive(Args)]
pub struct FdArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Amount deposited
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "rate")]
    pub annual_rate_pct: Option<Decimal>,

    /// Deposit term in years (fractions allowed)
    #[arg(long, alias = "years")]
    pub tenure_years: Option<Decimal>,

    /// Compounding periods per year (1 = annual, 4 = quarterly)
    #[arg(long, default_value = "1")]
    pub compounding_frequency: u32,
}

/// Arguments for a recurring deposit
#[derive(Args)]
pub struct RdArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Amount deposited at the start of each month
    #[arg(long)]
    pub monthly_deposit: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "rate")]
    pub annual_rate_pct: Option<Decimal>,

    /// Number of monthly deposits
    #[arg(long, alias = "months")]
    pub tenure_months: Option<u32>,
}

/// Arguments for the retirement corpus requirement
#[derive(Args)]
pub struct RetirementCorpusArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long)]
    pub current_age: Option<u32>,

    #[arg(long)]
    pub retirement_age: Option<u32>,

    /// Age up to which expenses must be funded
    #[arg(long, default_value = "85")]
    pub life_expectancy: u32,

    /// Monthly expense in today's money
    #[arg(long)]
    pub monthly_expense: Option<Decimal>,

    /// Annual inflation in percent
    #[arg(long)]
    pub inflation_pct: Option<Decimal>,

    /// Annual return on the corpus during retirement, in percent
    #[arg(long)]
    pub expected_return_pct: Option<Decimal>,
}

/// Arguments for projecting savings up to retirement
#[derive(Args)]
pub struct RetirementSavingsArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Savings already accumulated
    #[arg(long, default_value = "0")]
    pub current_savings: Decimal,

    /// Amount added at the start of each month
    #[arg(long, default_value = "0")]
    pub monthly_addition: Decimal,

    /// Expected annual return in percent
    #[arg(long)]
    pub annual_return_pct: Option<Decimal>,

    /// Years until retirement
    #[arg(long)]
    pub years_to_retirement: Option<Decimal>,
}

pub fn run_sip(args: SipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sip_input: SipInput = input::resolve(args.input.as_deref(), || {
        Ok(SipInput {
            monthly_investment: args
                .monthly_investment
                .ok_or("--monthly-investment is required (or provide --input)")?,
            annual_rate_pct: args
                .annual_rate_pct
                .ok_or("--annual-rate-pct is required (or provide --input)")?,
            tenure_years: args
                .tenure_years
                .ok_or("--tenure-years is required (or provide --input)")?,
        })
    })?;

    let result = deposits::calculate_sip(&sip_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_fd(args: FdArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let fd_input: FdInput = input::resolve(args.input.as_deref(), || {
        Ok(FdInput {
            principal: args.principal.ok_or("--principal is required (or provide --input)")?,
            annual_rate_pct: args
                .annual_rate_pct
                .ok_or("--annual-rate-pct is required (or provide --input)")?,
            tenure_years: args
                .tenure_years
                .ok_or("--tenure-years is required (or provide --input)")?,
            compounding_frequency: args.compounding_frequency,
        })
    })?;

    let result = deposits::calculate_fd(&fd_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_rd(args: RdArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rd_input: RdInput = input::resolve(args.input.as_deref(), || {
        Ok(RdInput {
            monthly_deposit: args
                .monthly_deposit
                .ok_or("--monthly-deposit is required (or provide --input)")?,
            annual_rate_pct: args
                .annual_rate_pct
                .ok_or("--annual-rate-pct is required (or provide --input)")?,
            tenure_months: args
                .tenure_months
                .ok_or("--tenure-months is required (or provide --input)")?,
        })
    })?;

    let result = deposits::calculate_rd(&rd_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_retirement_corpus(args: RetirementCorpusArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let corpus_input: RetirementCorpusInput = input::resolve(args.input.as_deref(), || {
        Ok(RetirementCorpusInput {
            current_age: args
                .current_age
                .ok_or("--current-age is required (or provide --input)")?,
            retirement_age: args
                .retirement_age
                .ok_or("--retirement-age is required (or provide --input)")?,
            life_expectancy: args.life_expectancy,
            monthly_expense: args
                .monthly_expense
                .ok_or("--monthly-expense is required (or provide --input)")?,
            inflation_pct: args
                .inflation_pct
                .ok_or("--inflation-pct is required (or provide --input)")?,
            expected_return_pct: args
                .expected_return_pct
                .ok_or("--expected-return-pct is required (or provide --input)")?,
        })
    })?;

    let result = retirement::calculate_retirement_corpus(&corpus_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_retirement_savings(
    args: RetirementSavingsArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let savings_input: RetirementSavingsInput = input::resolve(args.input.as_deref(), || {
        Ok(RetirementSavingsInput {
            current_savings: args.current_savings,
            monthly_addition: args.monthly_addition,
            annual_return_pct: args
                .annual_return_pct
                .ok_or("--annual-return-pct is required (or provide --input)")?,
            years_to_retirement: args
                .years_to_retirement
                .ok_or("--years-to-retirement is required (or provide --input)")?,
        })
    })?;

    let result = retirement::project_retirement_savings(&savings_input)?;
    Ok(serde_json::to_value(result)?)
}
