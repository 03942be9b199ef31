use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde_json::Value;
use std::path::PathBuf;

use banking_core::ledger::{self, AccountStore, SqliteAccountStore};

/// Arguments for account operations
#[derive(Args)]
pub struct AccountArgs {
    /// SQLite database holding the accounts
    #[arg(long, env = "BANKING_LEDGER_DB", default_value = "bank.db", global = true)]
    pub db: PathBuf,

    #[command(subcommand)]
    pub action: AccountAction,
}

#[derive(Subcommand)]
pub enum AccountAction {
    /// Open a zero-balance account
    Open {
        #[arg(long)]
        user: String,
    },
    /// Show an account
    Show {
        #[arg(long)]
        user: String,
    },
    /// Add funds
    Deposit {
        #[arg(long)]
        user: String,
        #[arg(long)]
        amount: Decimal,
    },
    /// Take funds out; fails when the balance is too low
    Withdraw {
        #[arg(long)]
        user: String,
        #[arg(long)]
        amount: Decimal,
    },
}

pub fn run_account(args: AccountArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let store = SqliteAccountStore::open(&args.db)?;
    let account = apply(&store, args.action)?;
    Ok(serde_json::to_value(account)?)
}

fn apply(
    store: &dyn AccountStore,
    action: AccountAction,
) -> Result<ledger::Account, Box<dyn std::error::Error>> {
    let account = match action {
        AccountAction::Open { user } => store.open_account(&user)?,
        AccountAction::Show { user } => store.get(&user)?,
        AccountAction::Deposit { user, amount } => ledger::deposit(store, &user, amount)?,
        AccountAction::Withdraw { user, amount } => ledger::withdraw(store, &user, amount)?,
    };
    Ok(account)
}
