use std::{fmt::Display, ops::RangeInclusive};

use parking_lot::Mutex;
use rand::{Rng, SeedableRng, distributions::uniform::SampleUniform, rngs::StdRng};
use thiserror::Error;

use crate::{
    account::{AccountId, AccountNumber},
    config::LedgerConfig,
};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("No unique {what} found after {attempts} attempts")]
pub struct AllocationExhausted {
    pub what: &'static str,
    pub attempts: usize,
}

/// Draws random account ids and numbers and keeps the first one the caller
/// reports as free. Callers hold whatever lock makes `is_taken` authoritative.
pub struct AccountAllocator {
    rng: Mutex<StdRng>,
    id_range: RangeInclusive<AccountId>,
    number_range: RangeInclusive<AccountNumber>,
    max_attempts: usize,
}

impl AccountAllocator {
    pub fn new(config: &LedgerConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic sequence, for reproducible runs.
    pub fn seeded(config: &LedgerConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &LedgerConfig, rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
            id_range: config.id_range.clone(),
            number_range: config.number_range.clone(),
            max_attempts: config.max_allocation_attempts.max(1),
        }
    }

    pub fn next_id(
        &self,
        is_taken: impl Fn(AccountId) -> bool,
    ) -> Result<AccountId, AllocationExhausted> {
        self.draw("account id", &self.id_range, is_taken)
    }

    pub fn next_number(
        &self,
        is_taken: impl Fn(AccountNumber) -> bool,
    ) -> Result<AccountNumber, AllocationExhausted> {
        self.draw("account number", &self.number_range, is_taken)
    }

    fn draw<T>(
        &self,
        what: &'static str,
        range: &RangeInclusive<T>,
        is_taken: impl Fn(T) -> bool,
    ) -> Result<T, AllocationExhausted>
    where
        T: SampleUniform + PartialOrd + Copy + Display,
    {
        let mut rng = self.rng.lock();
        for attempt in 1..=self.max_attempts {
            let candidate = rng.gen_range(range.clone());
            if !is_taken(candidate) {
                return Ok(candidate);
            }
            tracing::warn!(%candidate, attempt, "{what} collision, drawing again");
        }
        Err(AllocationExhausted {
            what,
            attempts: self.max_attempts,
        })
    }
}
