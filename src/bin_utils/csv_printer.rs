use std::io::Write;

use crate::account::Account;
use csv::Writer;

pub fn print_accounts<W>(
    output: &mut W,
    accounts: impl Iterator<Item = Account>,
) -> anyhow::Result<()>
where
    W: Write,
{
    let mut writer = Writer::from_writer(output);
    for acc in accounts {
        if let Err(err) = writer.serialize(acc) {
            anyhow::bail!("Failed to write to CSV: {err}")
        }
    }
    if let Err(err) = writer.flush() {
        anyhow::bail!("Failed to flush CSV writer: {err}")
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use rust_decimal::{Decimal, prelude::FromPrimitive};

    use super::*;

    #[test]
    fn prints_header_and_rows() {
        let mut acc = Account::open(3, 1_000_000_007, "Ada", "Lovelace");
        let credit = acc.handle_mutation(Decimal::from_f64(1.5).unwrap()).unwrap();
        acc.apply(&credit);

        let mut output = Vec::new();
        print_accounts(&mut output, [acc].into_iter()).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "id,first_name,last_name,number,balance\n3,Ada,Lovelace,1000000007,1.5\n"
        );
    }
}
