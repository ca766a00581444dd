use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

pub type AccountId = u32;
pub type AccountNumber = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceEventKind {
    Credited,
    Debited,
}

/// Validated balance change. Only [`Account::handle_mutation`] produces these,
/// so applying one can never push the balance below zero.
#[derive(Debug, Clone)]
pub struct BalanceEvent {
    amount: Decimal,
    kind: BalanceEventKind,
}

impl BalanceEvent {
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn kind(&self) -> BalanceEventKind {
        self.kind
    }

    /// Event that undoes this one when applied right after it.
    pub fn reversal(&self) -> BalanceEvent {
        BalanceEvent {
            amount: self.amount,
            kind: match self.kind {
                BalanceEventKind::Credited => BalanceEventKind::Debited,
                BalanceEventKind::Debited => BalanceEventKind::Credited,
            },
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Insufficient funds: balance is {balance}, requested {requested}")]
    InsufficientFunds {
        balance: Decimal,
        requested: Decimal,
    },
    #[error("Crediting {amount} would overflow the balance")]
    BalanceOverflow { amount: Decimal },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    id: AccountId,
    first_name: String,
    last_name: String,
    number: AccountNumber,
    balance: Decimal,
}

impl Account {
    pub fn open(
        id: AccountId,
        number: AccountNumber,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            number,
            balance: Decimal::ZERO,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn number(&self) -> AccountNumber {
        self.number
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn rename(&mut self, first_name: impl Into<String>, last_name: impl Into<String>) {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
    }

    pub fn apply(&mut self, event: &BalanceEvent) {
        match event.kind {
            BalanceEventKind::Credited => {
                self.balance += event.amount;
            }
            BalanceEventKind::Debited => {
                self.balance -= event.amount;
            }
        }
    }

    /// Validates a signed balance change against the current balance.
    pub fn handle_mutation(&self, delta: Decimal) -> Result<BalanceEvent, AccountError> {
        if delta < Decimal::ZERO {
            let requested = -delta;
            if self.balance >= requested {
                Ok(BalanceEvent {
                    amount: requested,
                    kind: BalanceEventKind::Debited,
                })
            } else {
                Err(AccountError::InsufficientFunds {
                    balance: self.balance,
                    requested,
                })
            }
        } else {
            match self.balance.checked_add(delta) {
                Some(_) => Ok(BalanceEvent {
                    amount: delta,
                    kind: BalanceEventKind::Credited,
                }),
                None => Err(AccountError::BalanceOverflow { amount: delta }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::prelude::{FromPrimitive, Zero};

    use super::*;

    #[test]
    fn open_starts_with_zero_balance() {
        let acc = Account::open(7, 1_234_567_890, "Ada", "Lovelace");
        assert_eq!(acc.id(), 7);
        assert_eq!(acc.number(), 1_234_567_890);
        assert_eq!(acc.first_name(), "Ada");
        assert_eq!(acc.last_name(), "Lovelace");
        assert!(acc.balance().is_zero());
    }

    #[test]
    fn apply_events() {
        let mut acc = Account::open(1, 1, "a", "b");
        acc.apply(&BalanceEvent {
            amount: Decimal::from_u32(10).unwrap(),
            kind: BalanceEventKind::Credited,
        });
        assert_eq!(acc.balance(), Decimal::from_u32(10).unwrap());
        acc.apply(&BalanceEvent {
            amount: Decimal::from_u32(3).unwrap(),
            kind: BalanceEventKind::Debited,
        });
        assert_eq!(acc.balance(), Decimal::from_u32(7).unwrap());
    }

    #[test]
    fn handle_mutation() {
        let mut acc = Account::open(1, 1, "a", "b");

        // debit from empty account
        let err = acc
            .handle_mutation(Decimal::from_i32(-5).unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            AccountError::InsufficientFunds {
                balance: Decimal::zero(),
                requested: Decimal::from_u32(5).unwrap(),
            }
        );

        // credit
        let credit = acc.handle_mutation(Decimal::from_u32(13).unwrap()).unwrap();
        assert_eq!(credit.kind(), BalanceEventKind::Credited);
        assert_eq!(credit.amount(), Decimal::from_u32(13).unwrap());
        acc.apply(&credit);

        // debit down to exactly zero is allowed
        let debit = acc.handle_mutation(Decimal::from_i32(-13).unwrap()).unwrap();
        assert_eq!(debit.kind(), BalanceEventKind::Debited);
        assert_eq!(debit.amount(), Decimal::from_u32(13).unwrap());
        acc.apply(&debit);
        assert!(acc.balance().is_zero());
    }

    #[test]
    fn credit_overflow_is_rejected() {
        let mut acc = Account::open(1, 1, "a", "b");
        let credit = acc.handle_mutation(Decimal::MAX).unwrap();
        acc.apply(&credit);
        let err = acc.handle_mutation(Decimal::ONE).unwrap_err();
        assert!(matches!(err, AccountError::BalanceOverflow { .. }));
        assert_eq!(acc.balance(), Decimal::MAX);
    }

    #[test]
    fn reversal_restores_balance() {
        let mut acc = Account::open(1, 1, "a", "b");
        let credit = acc.handle_mutation(Decimal::from_u32(20).unwrap()).unwrap();
        acc.apply(&credit);
        let debit = acc.handle_mutation(Decimal::from_i32(-8).unwrap()).unwrap();
        acc.apply(&debit);
        assert_eq!(acc.balance(), Decimal::from_u32(12).unwrap());
        acc.apply(&debit.reversal());
        assert_eq!(acc.balance(), Decimal::from_u32(20).unwrap());
    }

    #[test]
    fn rename_keeps_balance_and_identity() {
        let mut acc = Account::open(4, 99, "Ada", "Lovelace");
        let credit = acc.handle_mutation(Decimal::from_u32(5).unwrap()).unwrap();
        acc.apply(&credit);
        acc.rename("Ada", "King");
        assert_eq!(acc.last_name(), "King");
        assert_eq!(acc.id(), 4);
        assert_eq!(acc.number(), 99);
        assert_eq!(acc.balance(), Decimal::from_u32(5).unwrap());
    }
}
