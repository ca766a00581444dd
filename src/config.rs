use std::{
    env::{self, VarError},
    ops::RangeInclusive,
    str::FromStr,
};

use thiserror::Error;

use crate::account::{AccountId, AccountNumber};

/// Ten digit account numbers.
const DEFAULT_NUMBER_RANGE: RangeInclusive<AccountNumber> = 1_000_000_000..=9_999_999_999;
const DEFAULT_MAX_ALLOCATION_ATTEMPTS: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for environment variable `{0}`")]
    InvalidValue(&'static str),
    #[error("`{0}` describes an empty range")]
    EmptyRange(&'static str),
}

#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// How many random draws the allocator makes before giving up.
    pub max_allocation_attempts: usize,
    pub id_range: RangeInclusive<AccountId>,
    pub number_range: RangeInclusive<AccountNumber>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_allocation_attempts: DEFAULT_MAX_ALLOCATION_ATTEMPTS,
            id_range: 1..=AccountId::MAX,
            number_range: DEFAULT_NUMBER_RANGE,
        }
    }
}

impl LedgerConfig {
    /// Defaults, overridden by `LEDGER_MAX_ALLOCATION_ATTEMPTS`, `LEDGER_ID_MAX`,
    /// `LEDGER_NUMBER_MIN` and `LEDGER_NUMBER_MAX` when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let max_allocation_attempts = env_or(
            "LEDGER_MAX_ALLOCATION_ATTEMPTS",
            defaults.max_allocation_attempts,
        )?;
        let id_max = env_or("LEDGER_ID_MAX", *defaults.id_range.end())?;
        let number_min = env_or("LEDGER_NUMBER_MIN", *defaults.number_range.start())?;
        let number_max = env_or("LEDGER_NUMBER_MAX", *defaults.number_range.end())?;

        let config = Self {
            max_allocation_attempts,
            id_range: *defaults.id_range.start()..=id_max,
            number_range: number_min..=number_max,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_allocation_attempts == 0 {
            return Err(ConfigError::InvalidValue("LEDGER_MAX_ALLOCATION_ATTEMPTS"));
        }
        if self.id_range.is_empty() {
            return Err(ConfigError::EmptyRange("LEDGER_ID_MAX"));
        }
        if self.number_range.is_empty() {
            return Err(ConfigError::EmptyRange("LEDGER_NUMBER_MIN..LEDGER_NUMBER_MAX"));
        }
        Ok(())
    }
}

fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key)),
        Err(VarError::NotPresent) => Ok(default),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::InvalidValue(key)),
    }
}
