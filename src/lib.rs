/// Account record and the balance events that change it.
pub mod account;

/// Random, collision-checked allocation of account ids and numbers.
pub mod allocator;

/// Ledger settings, with environment overrides.
pub mod config;

/// Ledger storage interface plus the in-memory implementation.
/// Every balance change goes through [`store::LedgerStore::mutate_balance`]
/// or a transfer.
pub mod store;

/// Atomic debit/credit of two accounts.
pub mod transfer;

/// Batch commands, parsed from raw rows into validated ledger operations.
pub mod command;

/// Executes batch commands against a ledger.
pub mod processor;

/// CSV batch driver. Lives in the library so integration tests can use it.
pub mod bin_utils;
