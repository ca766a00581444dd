//! Account storage. [`LedgerStore`] covers single-account operations only.
//! Transfers need both accounts pinned and locked together, which only
//! [`in_memory_store::InMemoryLedgerStore`] exposes, so
//! [`TransferCoordinator`](crate::transfer::TransferCoordinator) is tied to that table.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::{Account, AccountError, AccountId},
    allocator::AllocationExhausted,
};

pub mod in_memory_store;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Account {0} not found")]
    NotFound(AccountId),
    #[error("Account {0} is locked by an in-flight transfer")]
    Conflict(AccountId),
    #[error("Insufficient funds in account {id}: balance is {balance}, requested {requested}")]
    InsufficientFunds {
        id: AccountId,
        balance: Decimal,
        requested: Decimal,
    },
    #[error("Invalid amount {amount}: {reason}")]
    InvalidAmount {
        amount: Decimal,
        reason: &'static str,
    },
    #[error("Source and destination are the same account ({0})")]
    SameAccount(AccountId),
    #[error(transparent)]
    AllocationExhausted(#[from] AllocationExhausted),
}

impl LedgerError {
    pub(crate) fn from_account(id: AccountId, err: AccountError) -> Self {
        match err {
            AccountError::InsufficientFunds { balance, requested } => Self::InsufficientFunds {
                id,
                balance,
                requested,
            },
            AccountError::BalanceOverflow { amount } => Self::InvalidAmount {
                amount,
                reason: "balance would overflow",
            },
        }
    }
}

/// Account table contract. Implementations must be safe to call from many
/// threads at once without external serialization.
pub trait LedgerStore {
    /// Opens an account with a fresh id and number and a zero balance.
    fn create_account(&self, first_name: &str, last_name: &str) -> Result<Account, LedgerError>;

    fn get_account(&self, id: AccountId) -> Result<Account, LedgerError>;

    /// Copies the holder names from `account` onto the stored record.
    /// Balance, id and number of the stored record are left as they are.
    fn update_account(&self, account: &Account) -> Result<Account, LedgerError>;

    fn delete_account(&self, id: AccountId) -> Result<(), LedgerError>;

    /// Applies a signed `delta` and returns the new balance. The only way to
    /// change a balance outside of a transfer.
    fn mutate_balance(&self, id: AccountId, delta: Decimal) -> Result<Decimal, LedgerError>;

    /// Consistent snapshot of every account, ordered by id.
    fn accounts(&self) -> Vec<Account>;
}
