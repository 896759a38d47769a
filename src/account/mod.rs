//! Account ledger
//!
//! Owns balance reads and debits. All balance-dependent decisions must be
//! made on a row fetched with [`AccountRepository::find_with_lock`] inside
//! the same transaction that performs the debit.

pub mod models;
pub mod repository;

pub use models::Account;
pub use repository::AccountRepository;
