mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::account::AccountArgs;
use commands::estimate::EstimateLoanArgs;
use commands::loans::{CardMinimumArgs, CardPayoffArgs, EmiArgs, HomeLoanArgs};
use commands::planning::{
    BudgetArgs, IncomeTaxArgs, NetWorthArgs, SavingsAdviceArgs, TaxableIncomeArgs,
};
use commands::savings::{FdArgs, RdArgs, RetirementCorpusArgs, RetirementSavingsArgs, SipArgs};

/// Personal banking calculators, loan estimates and account balances
#[derive(Parser)]
#[command(
    name = "bank",
    version,
    about = "Personal banking calculators, loan estimates and account balances",
    long_about = "Loan, deposit, retirement, tax and budgeting calculators with decimal \
                  precision, a loan amount estimator backed by a trained model or a \
                  fallback formula, and a SQLite account ledger. Inputs come from flags, \
                  a JSON/YAML file (--input) or JSON on stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Equated monthly installment for a loan
    Emi(EmiArgs),
    /// Maturity of a monthly systematic investment plan
    Sip(SipArgs),
    /// Fixed deposit maturity with periodic compounding
    Fd(FdArgs),
    /// Recurring deposit maturity
    Rd(RdArgs),
    /// Corpus needed to fund retirement expenses
    RetirementCorpus(RetirementCorpusArgs),
    /// Project current savings and monthly additions to retirement
    RetirementSavings(RetirementSavingsArgs),
    /// Maximum home loan for an income and tenure
    HomeLoan(HomeLoanArgs),
    /// Months to clear a card balance with a fixed payment
    CardPayoff(CardPayoffArgs),
    /// Card balance after paying only the minimum
    CardMinimum(CardMinimumArgs),
    /// Income tax under a slab regime
    IncomeTax(IncomeTaxArgs),
    /// Taxable income after deductions
    TaxableIncome(TaxableIncomeArgs),
    /// Split income across budget categories
    Budget(BudgetArgs),
    /// Recommended monthly savings from the expense ratio
    SavingsAdvice(SavingsAdviceArgs),
    /// Assets less liabilities
    NetWorth(NetWorthArgs),
    /// Estimate an eligible loan amount
    EstimateLoan(EstimateLoanArgs),
    /// Open, inspect and move money in accounts
    Account(AccountArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing() {
    // Logs go to stderr; stdout carries only the formatted result.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Emi(args) => commands::loans::run_emi(args),
        Commands::Sip(args) => commands::savings::run_sip(args),
        Commands::Fd(args) => commands::savings::run_fd(args),
        Commands::Rd(args) => commands::savings::run_rd(args),
        Commands::RetirementCorpus(args) => commands::savings::run_retirement_corpus(args),
        Commands::RetirementSavings(args) => commands::savings::run_retirement_savings(args),
        Commands::HomeLoan(args) => commands::loans::run_home_loan(args),
        Commands::CardPayoff(args) => commands::loans::run_card_payoff(args),
        Commands::CardMinimum(args) => commands::loans::run_card_minimum(args),
        Commands::IncomeTax(args) => commands::planning::run_income_tax(args),
        Commands::TaxableIncome(args) => commands::planning::run_taxable_income(args),
        Commands::Budget(args) => commands::planning::run_budget(args),
        Commands::SavingsAdvice(args) => commands::planning::run_savings_advice(args),
        Commands::NetWorth(args) => commands::planning::run_net_worth(args),
        Commands::EstimateLoan(args) => commands::estimate::run_estimate_loan(args),
        Commands::Account(args) => commands::account::run_account(args),
        Commands::Version => {
            println!("bank {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
