//! Per-user account balances.
//!
//! [`Account`] enforces the balance rules; an [`AccountStore`] serializes
//! mutations per account. [`deposit`] and [`withdraw`] are the entry points
//! callers are expected to use.

pub mod account;
pub mod store;

#[cfg(feature = "sqlite")]
pub mod sqlite;

use tracing::debug;

use crate::types::Money;
use crate::BankingResult;

pub use account::Account;
pub use store::{AccountOp, AccountStore, InMemoryAccountStore};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteAccountStore;

pub fn deposit(store: &dyn AccountStore, user_id: &str, amount: Money) -> BankingResult<Account> {
    let account = store.modify(user_id, &mut |a| a.deposit(amount))?;
    debug!(user_id, amount = %amount, balance = %account.balance(), "Deposit applied");
    Ok(account)
}

pub fn withdraw(store: &dyn AccountStore, user_id: &str, amount: Money) -> BankingResult<Account> {
    let account = store.modify(user_id, &mut |a| a.withdraw(amount))?;
    debug!(user_id, amount = %amount, balance = %account.balance(), "Withdrawal applied");
    Ok(account)
}
