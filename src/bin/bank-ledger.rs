use std::{fs::File, io};

use anyhow::{Context, Result};
use bank_ledger::{bin_utils::Service, config::LedgerConfig, processor::LedgerProcessError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bank_ledger=info")),
        )
        .with_writer(io::stderr)
        .init();

    let filename = std::env::args()
        .nth(1)
        .context("Expected a file name as the first argument")?;
    let file = File::open(&filename).with_context(|| format!("Failed to open `{filename}`"))?;
    let config = LedgerConfig::from_env().context("Invalid ledger configuration")?;

    let service = Service {
        input: file,
        output: &mut io::stdout(),
        config,
        error_printer: Box::new(|line, err| {
            match err {
                LedgerProcessError::CommandErr(err) => {
                    eprintln!("Error at line {line}: {err}")
                }
                LedgerProcessError::LedgerErr(err) => {
                    // business rejections, not input errors
                    tracing::debug!(line, %err, "command rejected");
                }
            }
        }),
    };
    service.run()
}
