use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use parking_lot::{Mutex, MutexGuard, RwLock};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::{
    account::{Account, AccountId, AccountNumber},
    allocator::AccountAllocator,
    config::LedgerConfig,
};

use super::{LedgerError, LedgerStore};

struct AccountSlot {
    number: AccountNumber,
    account: Mutex<Account>,
    /// Transfers currently holding this slot.
    pins: AtomicUsize,
}

/// Slot kept alive and undeletable for as long as the guard exists.
pub(crate) struct PinnedAccount {
    slot: Arc<AccountSlot>,
}

impl PinnedAccount {
    fn pin(slot: &Arc<AccountSlot>) -> Self {
        slot.pins.fetch_add(1, Ordering::AcqRel);
        Self { slot: slot.clone() }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Account> {
        self.slot.account.lock()
    }
}

impl Drop for PinnedAccount {
    fn drop(&mut self) {
        self.slot.pins.fetch_sub(1, Ordering::AcqRel);
    }
}

#[derive(Default)]
struct AccountTable {
    slots: HashMap<AccountId, Arc<AccountSlot>>,
    numbers: HashSet<AccountNumber>,
}

/// Account table held in memory. Each account sits behind its own mutex, so
/// operations on different accounts never wait on each other; the table lock
/// is only held for lookups, creation and deletion.
pub struct InMemoryLedgerStore {
    table: RwLock<AccountTable>,
    allocator: AccountAllocator,
}

impl Default for InMemoryLedgerStore {
    fn default() -> Self {
        Self::new(&LedgerConfig::default())
    }
}

impl InMemoryLedgerStore {
    pub fn new(config: &LedgerConfig) -> Self {
        Self::with_allocator(AccountAllocator::new(config))
    }

    pub fn with_allocator(allocator: AccountAllocator) -> Self {
        Self {
            table: RwLock::new(AccountTable::default()),
            allocator,
        }
    }

    pub fn len(&self) -> usize {
        self.table.read().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pins both accounts under a single table lookup, so neither can be
    /// deleted until the returned guards are dropped.
    pub(crate) fn pin_pair(
        &self,
        first: AccountId,
        second: AccountId,
    ) -> Result<(PinnedAccount, PinnedAccount), LedgerError> {
        let table = self.table.read();
        let first_slot = table.slots.get(&first).ok_or(LedgerError::NotFound(first))?;
        let second_slot = table
            .slots
            .get(&second)
            .ok_or(LedgerError::NotFound(second))?;
        Ok((PinnedAccount::pin(first_slot), PinnedAccount::pin(second_slot)))
    }

    fn with_account<T>(
        &self,
        id: AccountId,
        f: impl FnOnce(&mut Account) -> Result<T, LedgerError>,
    ) -> Result<T, LedgerError> {
        let table = self.table.read();
        let slot = table.slots.get(&id).ok_or(LedgerError::NotFound(id))?;
        let mut account = slot.account.lock();
        f(&mut account)
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn create_account(&self, first_name: &str, last_name: &str) -> Result<Account, LedgerError> {
        let mut table = self.table.write();
        let id = self
            .allocator
            .next_id(|id| table.slots.contains_key(&id))?;
        let number = self
            .allocator
            .next_number(|number| table.numbers.contains(&number))?;

        let account = Account::open(id, number, first_name, last_name);
        table.numbers.insert(number);
        table.slots.insert(
            id,
            Arc::new(AccountSlot {
                number,
                account: Mutex::new(account.clone()),
                pins: AtomicUsize::new(0),
            }),
        );
        debug!(id, number, "account created");
        Ok(account)
    }

    fn get_account(&self, id: AccountId) -> Result<Account, LedgerError> {
        self.with_account(id, |account| Ok(account.clone()))
    }

    fn update_account(&self, account: &Account) -> Result<Account, LedgerError> {
        self.with_account(account.id(), |stored| {
            stored.rename(account.first_name(), account.last_name());
            Ok(stored.clone())
        })
    }

    fn delete_account(&self, id: AccountId) -> Result<(), LedgerError> {
        let mut table = self.table.write();
        let slot = table.slots.get(&id).ok_or(LedgerError::NotFound(id))?;
        if slot.pins.load(Ordering::Acquire) > 0 {
            warn!(id, "refusing to delete account held by a transfer");
            return Err(LedgerError::Conflict(id));
        }
        let number = slot.number;
        table.slots.remove(&id);
        table.numbers.remove(&number);
        debug!(id, number, "account deleted");
        Ok(())
    }

    fn mutate_balance(&self, id: AccountId, delta: Decimal) -> Result<Decimal, LedgerError> {
        self.with_account(id, |account| {
            let event = account
                .handle_mutation(delta)
                .map_err(|err| LedgerError::from_account(id, err))?;
            account.apply(&event);
            debug!(id, %delta, balance = %account.balance(), "balance mutated");
            Ok(account.balance())
        })
    }

    fn accounts(&self) -> Vec<Account> {
        let table = self.table.read();
        let mut slots: Vec<_> = table.slots.iter().collect();
        slots.sort_unstable_by_key(|(id, _)| **id);
        // ascending id order, same as transfers, so this cannot deadlock with them
        let guards: Vec<_> = slots.iter().map(|(_, slot)| slot.account.lock()).collect();
        guards.iter().map(|account| (**account).clone()).collect()
    }
}
