use std::{collections::HashMap, sync::Arc};

use crate::{
    account::AccountId,
    command::{Alias, CommandRow, LedgerCommand},
    store::{LedgerStore, in_memory_store::InMemoryLedgerStore},
    transfer::TransferCoordinator,
};

use super::{CommandProcessor, LedgerProcessError};

/// Runs batch commands against a ledger, tracking which alias maps to which
/// allocated account id.
pub struct BatchProcessor {
    aliases: HashMap<Alias, AccountId>,
    coordinator: TransferCoordinator,
}

impl BatchProcessor {
    pub fn new(store: Arc<InMemoryLedgerStore>) -> Self {
        Self {
            aliases: HashMap::new(),
            coordinator: TransferCoordinator::new(store),
        }
    }

    pub fn store(&self) -> &InMemoryLedgerStore {
        self.coordinator.store()
    }

    pub fn account_id(&self, alias: Alias) -> Option<AccountId> {
        self.aliases.get(&alias).copied()
    }
}

impl CommandProcessor for BatchProcessor {
    fn process_command(&mut self, row: CommandRow) -> Result<(), LedgerProcessError> {
        let cmd = LedgerCommand::parse_command(&self.aliases, row)?;
        let store = self.coordinator.store();
        match cmd {
            LedgerCommand::Open {
                alias,
                first_name,
                last_name,
            } => {
                let account = store.create_account(&first_name, &last_name)?;
                // bind only when the account exists
                self.aliases.insert(alias, account.id());
            }
            LedgerCommand::Rename {
                id,
                first_name,
                last_name,
            } => {
                let mut account = store.get_account(id)?;
                account.rename(first_name, last_name);
                store.update_account(&account)?;
            }
            LedgerCommand::Close { alias, id } => {
                store.delete_account(id)?;
                self.aliases.remove(&alias);
            }
            LedgerCommand::Adjust { id, delta } => {
                store.mutate_balance(id, delta)?;
            }
            LedgerCommand::Transfer {
                source,
                dest,
                amount,
            } => {
                self.coordinator.transfer(source, dest, amount)?;
            }
        };
        Ok(())
    }
}
