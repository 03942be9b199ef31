use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::account::Account;
use crate::error::BankingError;
use crate::BankingResult;

/// Mutation applied to a working copy of an account inside a store
/// transaction.
pub type AccountOp<'a> = &'a mut dyn FnMut(&mut Account) -> BankingResult<()>;

/// Persistence boundary for account balances.
///
/// `modify` is the only way to change a balance. Implementations run the
/// read-modify-write while holding a lock scoped to that one account and
/// commit only when `op` returns `Ok`, so a failed operation leaves the
/// stored account untouched.
pub trait AccountStore: Send + Sync {
    /// Create a zero-balance account. Fails with `AccountExists` for a
    /// duplicate user.
    fn open_account(&self, user_id: &str) -> BankingResult<Account>;

    fn get(&self, user_id: &str) -> BankingResult<Account>;

    fn modify(&self, user_id: &str, op: AccountOp<'_>) -> BankingResult<Account>;
}

/// Process-local store. Each account lives in its own DashMap shard entry,
/// so operations on different users do not contend on a global lock.
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: DashMap<String, Account>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl AccountStore for InMemoryAccountStore {
    fn open_account(&self, user_id: &str) -> BankingResult<Account> {
        match self.accounts.entry(user_id.to_string()) {
            Entry::Occupied(_) => Err(BankingError::AccountExists(user_id.to_string())),
            Entry::Vacant(slot) => {
                let account = Account::open(user_id);
                slot.insert(account.clone());
                Ok(account)
            }
        }
    }

    fn get(&self, user_id: &str) -> BankingResult<Account> {
        self.accounts
            .get(user_id)
            .map(|a| a.value().clone())
            .ok_or_else(|| BankingError::AccountNotFound(user_id.to_string()))
    }

    fn modify(&self, user_id: &str, op: AccountOp<'_>) -> BankingResult<Account> {
        // The write guard holds the shard lock for the whole read-modify-write.
        let mut stored = self
            .accounts
            .get_mut(user_id)
            .ok_or_else(|| BankingError::AccountNotFound(user_id.to_string()))?;

        let mut working = stored.value().clone();
        op(&mut working)?;
        *stored.value_mut() = working.clone();
        Ok(working)
    }
}
