use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::account::AccountId;

/// Caller-chosen handle for an account inside a batch. The ledger allocates
/// the real ids, so batches refer to accounts through these.
pub type Alias = u32;

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Open,
    Rename,
    Close,
    Deposit,
    Withdraw,
    Transfer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandRow {
    #[serde(rename = "type")]
    pub kind: CommandKind,
    pub account: Alias,
    pub counterparty: Option<Alias>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    Open {
        alias: Alias,
        first_name: String,
        last_name: String,
    },
    Rename {
        id: AccountId,
        first_name: String,
        last_name: String,
    },
    Close {
        alias: Alias,
        id: AccountId,
    },
    /// Deposit or withdrawal, as a signed delta.
    Adjust {
        id: AccountId,
        delta: Decimal,
    },
    Transfer {
        source: AccountId,
        dest: AccountId,
        amount: Decimal,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Amount is required for {kind:?}")]
    AmountRequired { kind: CommandKind },
    #[error("Amount must not be negative for {kind:?}")]
    NegativeAmount { kind: CommandKind },
    #[error("First and last name are required for {kind:?}")]
    NamesRequired { kind: CommandKind },
    #[error("Counterparty is required for {kind:?}")]
    CounterpartyRequired { kind: CommandKind },
    #[error("Alias {alias} is already bound to an open account")]
    DuplicateAlias { alias: Alias },
    #[error("Alias {alias} does not refer to an open account for {kind:?}")]
    UnknownAlias { alias: Alias, kind: CommandKind },
}

impl LedgerCommand {
    pub fn parse_command(
        aliases: &HashMap<Alias, AccountId>,
        row: CommandRow,
    ) -> Result<Self, CommandError> {
        let kind = row.kind;
        let resolve = |alias: Alias| {
            aliases
                .get(&alias)
                .copied()
                .ok_or(CommandError::UnknownAlias { alias, kind })
        };

        match kind {
            CommandKind::Open => {
                if aliases.contains_key(&row.account) {
                    return Err(CommandError::DuplicateAlias { alias: row.account });
                }
                let (first_name, last_name) =
                    Self::parse_names(row.first_name, row.last_name, kind)?;
                Ok(Self::Open {
                    alias: row.account,
                    first_name,
                    last_name,
                })
            }
            CommandKind::Rename => {
                let id = resolve(row.account)?;
                let (first_name, last_name) =
                    Self::parse_names(row.first_name, row.last_name, kind)?;
                Ok(Self::Rename {
                    id,
                    first_name,
                    last_name,
                })
            }
            CommandKind::Close => Ok(Self::Close {
                alias: row.account,
                id: resolve(row.account)?,
            }),
            CommandKind::Deposit => Ok(Self::Adjust {
                id: resolve(row.account)?,
                delta: Self::parse_adjustment(row.amount, kind)?,
            }),
            CommandKind::Withdraw => Ok(Self::Adjust {
                id: resolve(row.account)?,
                delta: -Self::parse_adjustment(row.amount, kind)?,
            }),
            CommandKind::Transfer => {
                let source = resolve(row.account)?;
                let counterparty = row
                    .counterparty
                    .ok_or(CommandError::CounterpartyRequired { kind })?;
                let dest = resolve(counterparty)?;
                // sign is the coordinator's call
                let amount = row.amount.ok_or(CommandError::AmountRequired { kind })?;
                Ok(Self::Transfer {
                    source,
                    dest,
                    amount,
                })
            }
        }
    }

    fn parse_names(
        first_name: Option<String>,
        last_name: Option<String>,
        kind: CommandKind,
    ) -> Result<(String, String), CommandError> {
        match (first_name, last_name) {
            (Some(first), Some(last)) if !first.is_empty() && !last.is_empty() => {
                Ok((first, last))
            }
            _ => Err(CommandError::NamesRequired { kind }),
        }
    }

    fn parse_adjustment(amount: Option<Decimal>, kind: CommandKind) -> Result<Decimal, CommandError> {
        let Some(amount) = amount else {
            return Err(CommandError::AmountRequired { kind });
        };
        if amount >= Decimal::ZERO {
            Ok(amount)
        } else {
            Err(CommandError::NegativeAmount { kind })
        }
    }
}
