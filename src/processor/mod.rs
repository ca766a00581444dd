use thiserror::Error;

use crate::{
    command::{CommandError, CommandRow},
    store::LedgerError,
};

pub mod batch_processor;

#[derive(Debug, Error)]
pub enum LedgerProcessError {
    #[error(transparent)]
    CommandErr(#[from] CommandError),
    #[error(transparent)]
    LedgerErr(#[from] LedgerError),
}

pub trait CommandProcessor {
    fn process_command(&mut self, row: CommandRow) -> Result<(), LedgerProcessError>;
}
