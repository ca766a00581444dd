//! Bootstraps [`bank_ledger`](crate) for batch runs: commands come in as CSV,
//! the final account table goes out as CSV.

use std::{
    io::{Read, Write},
    sync::Arc,
};

use crate::{
    config::LedgerConfig,
    processor::{CommandProcessor, LedgerProcessError, batch_processor::BatchProcessor},
    store::{LedgerStore, in_memory_store::InMemoryLedgerStore},
};
use anyhow::Result;
use csv_parser::CsvCommandParser;
use csv_printer::print_accounts;
pub mod csv_parser;
pub mod csv_printer;

pub struct Service<'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub config: LedgerConfig,
    pub error_printer: Box<dyn FnMut(u64, LedgerProcessError)>,
}

impl<'w, R, W> Service<'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        self.config.validate()?;
        let parser = CsvCommandParser::new(self.input);

        let store = Arc::new(InMemoryLedgerStore::new(&self.config));
        let mut processor = BatchProcessor::new(store.clone());

        for (line, row) in parser {
            let row = match row {
                Ok(row) => row,
                Err(err) => anyhow::bail!("Malformed command at line {line}: {err}"),
            };
            if let Err(err) = processor.process_command(row) {
                (self.error_printer)(line, err);
            }
        }

        print_accounts(self.output, store.accounts().into_iter())
    }
}
