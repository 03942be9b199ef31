use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BankingError;
use crate::types::Money;
use crate::BankingResult;

/// Smallest unit an amount may be expressed in (cents).
const AMOUNT_SCALE: u32 = 2;

/// One balance per user. The balance is never negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AccountRecord")]
pub struct Account {
    pub user_id: String,
    balance: Money,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Wire shape of an [`Account`]; deserialization goes through
/// [`Account::restore`].
#[derive(Deserialize)]
struct AccountRecord {
    user_id: String,
    balance: Money,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<AccountRecord> for Account {
    type Error = BankingError;

    fn try_from(r: AccountRecord) -> BankingResult<Self> {
        Account::restore(r.user_id, r.balance, r.created_at, r.updated_at)
    }
}

impl Account {
    /// New account with a zero balance.
    pub fn open(user_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            balance: Decimal::ZERO,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild an account from persisted state.
    pub fn restore(
        user_id: impl Into<String>,
        balance: Money,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> BankingResult<Self> {
        if balance < Decimal::ZERO {
            return Err(BankingError::Storage(format!(
                "persisted balance {balance} is negative"
            )));
        }
        Ok(Self {
            user_id: user_id.into(),
            balance,
            created_at,
            updated_at,
        })
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn deposit(&mut self, amount: Money) -> BankingResult<()> {
        validate_amount(amount)?;
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| BankingError::invalid_amount(amount, "balance would overflow"))?;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn withdraw(&mut self, amount: Money) -> BankingResult<()> {
        validate_amount(amount)?;
        if amount > self.balance {
            return Err(BankingError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        self.updated_at = Utc::now();
        Ok(())
    }
}

fn validate_amount(amount: Money) -> BankingResult<()> {
    if amount <= Decimal::ZERO {
        return Err(BankingError::invalid_amount(amount, "amount must be positive"));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(BankingError::invalid_amount(
            amount,
            "amount cannot have more than 2 decimal places",
        ));
    }
    Ok(())
}
