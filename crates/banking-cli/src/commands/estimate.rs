use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::path::PathBuf;

use banking_core::loan_estimator::{self, EstimatorConfig, LoanEstimateInput, LoanEstimator};

use crate::input;

/// Arguments for the loan amount estimate
#[derive(Args)]
pub struct EstimateLoanArgs {
    /// Path to JSON/YAML input file
    #[arg(long)]
    pub input: Option<String>,

    /// Applicant age (18-100)
    #[arg(long)]
    pub age: Option<u32>,

    #[arg(long)]
    pub monthly_income: Option<Decimal>,

    /// Credit score (300-900)
    #[arg(long)]
    pub credit_score: Option<u32>,

    /// Loan tenure in years (1-40)
    #[arg(long)]
    pub tenure_years: Option<u32>,

    #[arg(long, default_value = "0")]
    pub existing_loan_amount: Decimal,

    #[arg(long, default_value = "0")]
    pub dependents: u32,

    /// Model artifact to use instead of BANKING_LOAN_MODEL_PATHS
    #[arg(long)]
    pub model: Option<PathBuf>,
}

pub fn run_estimate_loan(args: EstimateLoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input: LoanEstimateInput = input::resolve(args.input.as_deref(), || {
        Ok(LoanEstimateInput {
            age: args.age.ok_or("--age is required (or provide --input)")?,
            monthly_income: args
                .monthly_income
                .ok_or("--monthly-income is required (or provide --input)")?,
            credit_score: args
                .credit_score
                .ok_or("--credit-score is required (or provide --input)")?,
            tenure_years: args
                .tenure_years
                .ok_or("--tenure-years is required (or provide --input)")?,
            existing_loan_amount: args.existing_loan_amount,
            dependents: args.dependents,
        })
    })?;

    let result = match args.model {
        Some(path) => {
            let config = EstimatorConfig {
                model_search_paths: vec![path],
                ..EstimatorConfig::from_env()?
            };
            LoanEstimator::new(config).estimate(&loan_input)?
        }
        None => loan_estimator::estimate_loan(&loan_input)?,
    };
    Ok(serde_json::to_value(result)?)
}
