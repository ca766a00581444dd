use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::{
    account::{Account, AccountId},
    store::{LedgerError, in_memory_store::InMemoryLedgerStore},
};

/// Moves funds between two accounts of an [`InMemoryLedgerStore`].
#[derive(Clone)]
pub struct TransferCoordinator {
    store: Arc<InMemoryLedgerStore>,
}

impl TransferCoordinator {
    pub fn new(store: Arc<InMemoryLedgerStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<InMemoryLedgerStore> {
        &self.store
    }

    /// Debits `source` and credits `dest` by `amount`, returning both updated
    /// accounts. Both accounts stay locked for the whole operation, so other
    /// callers see either the old balances or the new ones, never a mix.
    /// A failed transfer leaves both balances untouched.
    pub fn transfer(
        &self,
        source: AccountId,
        dest: AccountId,
        amount: Decimal,
    ) -> Result<(Account, Account), LedgerError> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount {
                amount,
                reason: "transfer amount must be positive",
            });
        }
        if source == dest {
            return Err(LedgerError::SameAccount(source));
        }

        let (source_pin, dest_pin) = self.store.pin_pair(source, dest)?;
        // lower id first, whatever the direction
        let (mut source_acc, mut dest_acc) = if source < dest {
            let source_acc = source_pin.lock();
            let dest_acc = dest_pin.lock();
            (source_acc, dest_acc)
        } else {
            let dest_acc = dest_pin.lock();
            let source_acc = source_pin.lock();
            (source_acc, dest_acc)
        };

        let debit = source_acc.handle_mutation(-amount).map_err(|err| {
            warn!(source, dest, %amount, %err, "transfer rejected");
            LedgerError::from_account(source, err)
        })?;
        source_acc.apply(&debit);

        match dest_acc.handle_mutation(amount) {
            Ok(credit) => dest_acc.apply(&credit),
            Err(err) => {
                source_acc.apply(&debit.reversal());
                warn!(source, dest, %amount, %err, "transfer credit failed, debit rolled back");
                return Err(LedgerError::from_account(dest, err));
            }
        }

        info!(source, dest, %amount, "transfer completed");
        Ok((source_acc.clone(), dest_acc.clone()))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::prelude::FromPrimitive;

    use crate::{allocator::AccountAllocator, config::LedgerConfig, store::LedgerStore};

    use super::*;

    fn coordinator() -> TransferCoordinator {
        let allocator = AccountAllocator::seeded(&LedgerConfig::default(), 11);
        TransferCoordinator::new(Arc::new(InMemoryLedgerStore::with_allocator(allocator)))
    }

    fn balance(coordinator: &TransferCoordinator, id: AccountId) -> Decimal {
        coordinator.store().get_account(id).unwrap().balance()
    }

    #[test]
    fn transfer_moves_funds() {
        let coordinator = coordinator();
        let store = coordinator.store();
        let a = store.create_account("a", "a").unwrap().id();
        let b = store.create_account("b", "b").unwrap().id();

        // nothing to send yet
        let err = coordinator
            .transfer(a, b, Decimal::from_u32(50).unwrap())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientFunds { id, .. } if id == a));
        assert!(balance(&coordinator, a).is_zero());
        assert!(balance(&coordinator, b).is_zero());

        store
            .mutate_balance(a, Decimal::from_u32(100).unwrap())
            .unwrap();
        let (src, dst) = coordinator
            .transfer(a, b, Decimal::from_u32(50).unwrap())
            .unwrap();
        assert_eq!(src.id(), a);
        assert_eq!(dst.id(), b);
        assert_eq!(src.balance(), Decimal::from_u32(50).unwrap());
        assert_eq!(dst.balance(), Decimal::from_u32(50).unwrap());
        assert_eq!(balance(&coordinator, a), Decimal::from_u32(50).unwrap());
        assert_eq!(balance(&coordinator, b), Decimal::from_u32(50).unwrap());
    }

    #[test]
    fn rejects_non_positive_amounts() {
        let coordinator = coordinator();
        let store = coordinator.store();
        let a = store.create_account("a", "a").unwrap().id();
        let b = store.create_account("b", "b").unwrap().id();
        store
            .mutate_balance(a, Decimal::from_u32(10).unwrap())
            .unwrap();

        for amount in [Decimal::ZERO, Decimal::from_i32(-5).unwrap()] {
            let err = coordinator.transfer(a, b, amount).unwrap_err();
            assert!(matches!(err, LedgerError::InvalidAmount { .. }));
        }
        assert_eq!(balance(&coordinator, a), Decimal::from_u32(10).unwrap());
        assert!(balance(&coordinator, b).is_zero());
    }

    #[test]
    fn rejects_same_account() {
        let coordinator = coordinator();
        let a = coordinator.store().create_account("a", "a").unwrap().id();
        let err = coordinator.transfer(a, a, Decimal::ONE).unwrap_err();
        assert_eq!(err, LedgerError::SameAccount(a));
    }

    #[test]
    fn missing_account_is_not_found() {
        let coordinator = coordinator();
        let store = coordinator.store();
        let a = store.create_account("a", "a").unwrap().id();
        store.mutate_balance(a, Decimal::TEN).unwrap();
        let missing = a.wrapping_add(1);

        assert_eq!(
            coordinator.transfer(a, missing, Decimal::ONE).unwrap_err(),
            LedgerError::NotFound(missing)
        );
        assert_eq!(
            coordinator.transfer(missing, a, Decimal::ONE).unwrap_err(),
            LedgerError::NotFound(missing)
        );
        assert_eq!(balance(&coordinator, a), Decimal::TEN);
    }

    #[test]
    fn failed_credit_rolls_back_debit() {
        let coordinator = coordinator();
        let store = coordinator.store();
        let a = store.create_account("a", "a").unwrap().id();
        let b = store.create_account("b", "b").unwrap().id();
        store.mutate_balance(a, Decimal::TEN).unwrap();
        store.mutate_balance(b, Decimal::MAX).unwrap();

        let err = coordinator.transfer(a, b, Decimal::ONE).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAmount { .. }));
        assert_eq!(balance(&coordinator, a), Decimal::TEN);
        assert_eq!(balance(&coordinator, b), Decimal::MAX);
    }

    #[test]
    fn reversed_direction_uses_same_lock_order() {
        let coordinator = coordinator();
        let store = coordinator.store();
        let a = store.create_account("a", "a").unwrap().id();
        let b = store.create_account("b", "b").unwrap().id();
        store.mutate_balance(a, Decimal::TEN).unwrap();

        coordinator.transfer(a, b, Decimal::TEN).unwrap();
        let (src, dst) = coordinator.transfer(b, a, Decimal::ONE).unwrap();
        assert_eq!(src.id(), b);
        assert_eq!(dst.id(), a);
        assert_eq!(src.balance(), Decimal::from_u32(9).unwrap());
        assert_eq!(dst.balance(), Decimal::ONE);
    }
}
