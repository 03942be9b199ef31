//! SQLite-backed account store.
//!
//! Balances are stored as decimal TEXT so no precision is lost through REAL.
//! Each `modify` runs inside a `BEGIN IMMEDIATE` transaction, which takes the
//! database write lock before the balance is read.
//!
//! SQLite admits one writer per database file, so operations on different
//! accounts are serialized here, through the connection mutex and the write
//! lock. Only [`InMemoryAccountStore`](super::store::InMemoryAccountStore)
//! lets separate accounts proceed in parallel.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use super::account::Account;
use super::store::{AccountOp, AccountStore};
use crate::error::BankingError;
use crate::BankingResult;

pub struct SqliteAccountStore {
    conn: Mutex<Connection>,
}

impl SqliteAccountStore {
    pub fn open(path: &Path) -> BankingResult<Self> {
        let conn = Connection::open(path)?;
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        info!(path = %path.display(), journal_mode = %mode, "Opened account database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> BankingResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> BankingResult<Self> {
        setup_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn setup_schema(conn: &Connection) -> BankingResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS accounts (
            user_id TEXT PRIMARY KEY NOT NULL,
            balance TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

fn parse_timestamp(raw: &str) -> BankingResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| BankingError::Storage(format!("bad timestamp '{raw}': {e}")))
}

fn load(conn: &Connection, user_id: &str) -> BankingResult<Option<Account>> {
    let row = conn
        .query_row(
            "SELECT balance, created_at, updated_at FROM accounts WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            },
        )
        .optional()?;

    let Some((balance, created_at, updated_at)) = row else {
        return Ok(None);
    };
    let balance = Decimal::from_str(&balance)
        .map_err(|e| BankingError::Storage(format!("bad balance '{balance}': {e}")))?;
    Account::restore(
        user_id,
        balance,
        parse_timestamp(&created_at)?,
        parse_timestamp(&updated_at)?,
    )
    .map(Some)
}

impl AccountStore for SqliteAccountStore {
    fn open_account(&self, user_id: &str) -> BankingResult<Account> {
        let conn = self.conn.lock();
        let account = Account::open(user_id);
        let inserted = conn.execute(
            "INSERT OR IGNORE INTO accounts (user_id, balance, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                account.user_id,
                account.balance().to_string(),
                account.created_at.to_rfc3339(),
                account.updated_at.to_rfc3339(),
            ],
        )?;
        if inserted == 0 {
            return Err(BankingError::AccountExists(user_id.to_string()));
        }
        Ok(account)
    }

    fn get(&self, user_id: &str) -> BankingResult<Account> {
        let conn = self.conn.lock();
        load(&conn, user_id)?.ok_or_else(|| BankingError::AccountNotFound(user_id.to_string()))
    }

    fn modify(&self, user_id: &str, op: AccountOp<'_>) -> BankingResult<Account> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut account =
            load(&tx, user_id)?.ok_or_else(|| BankingError::AccountNotFound(user_id.to_string()))?;
        // Dropping `tx` on error rolls the transaction back.
        op(&mut account)?;

        tx.execute(
            "UPDATE accounts SET balance = ?1, updated_at = ?2 WHERE user_id = ?3",
            params![
                account.balance().to_string(),
                account.updated_at.to_rfc3339(),
                user_id,
            ],
        )?;
        tx.commit()?;
        Ok(account)
    }
}
