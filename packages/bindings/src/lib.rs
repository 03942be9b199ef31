use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde::Serialize;

use banking_core::calculators::{
    budget, credit_card, deposits, emi, home_loan, income_tax, net_worth, retirement,
};
use banking_core::loan_estimator;
use banking_core::BankingResult;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// JSON in, computation envelope out.
fn run_json<I, O>(input_json: &str, compute: fn(&I) -> BankingResult<O>) -> NapiResult<String>
where
    I: DeserializeOwned,
    O: Serialize,
{
    let input: I = serde_json::from_str(input_json).map_err(to_napi_error)?;
    let output = compute(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_emi(input_json: String) -> NapiResult<String> {
    run_json(&input_json, emi::calculate_emi)
}

#[napi]
pub fn home_loan_eligibility(input_json: String) -> NapiResult<String> {
    run_json(&input_json, home_loan::calculate_home_loan_eligibility)
}

#[napi]
pub fn card_payoff(input_json: String) -> NapiResult<String> {
    run_json(&input_json, credit_card::calculate_card_payoff)
}

#[napi]
pub fn card_minimum_payments(input_json: String) -> NapiResult<String> {
    run_json(&input_json, credit_card::project_minimum_payments)
}

/// Uses the process-wide estimator; the model is loaded on the first call.
#[napi]
pub fn estimate_loan(input_json: String) -> NapiResult<String> {
    run_json(&input_json, loan_estimator::estimate_loan)
}

// ---------------------------------------------------------------------------
// Savings
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_sip(input_json: String) -> NapiResult<String> {
    run_json(&input_json, deposits::calculate_sip)
}

#[napi]
pub fn calculate_fd(input_json: String) -> NapiResult<String> {
    run_json(&input_json, deposits::calculate_fd)
}

#[napi]
pub fn calculate_rd(input_json: String) -> NapiResult<String> {
    run_json(&input_json, deposits::calculate_rd)
}

#[napi]
pub fn retirement_corpus(input_json: String) -> NapiResult<String> {
    run_json(&input_json, retirement::calculate_retirement_corpus)
}

#[napi]
pub fn retirement_savings(input_json: String) -> NapiResult<String> {
    run_json(&input_json, retirement::project_retirement_savings)
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_income_tax(input_json: String) -> NapiResult<String> {
    run_json(&input_json, income_tax::calculate_income_tax)
}

#[napi]
pub fn calculate_taxable_income(input_json: String) -> NapiResult<String> {
    run_json(&input_json, income_tax::calculate_taxable_income)
}

#[napi]
pub fn budget_plan(input_json: String) -> NapiResult<String> {
    run_json(&input_json, budget::plan_budget)
}

#[napi]
pub fn savings_advice(input_json: String) -> NapiResult<String> {
    run_json(&input_json, budget::recommend_savings)
}

#[napi]
pub fn calculate_net_worth(input_json: String) -> NapiResult<String> {
    run_json(&input_json, net_worth::calculate_net_worth)
}
