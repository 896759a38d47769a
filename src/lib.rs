//! pix_withdraw - Account Withdrawal Engine
//!
//! Lets an account holder withdraw funds immediately or at a future scheduled
//! time. The balance-debit protocol runs inside a single PostgreSQL
//! transaction under row locks, so an account is never debited twice for the
//! same withdrawal even with concurrent requests or replicated scheduler
//! workers.
//!
//! # Modules
//!
//! - [`account`] - Account ledger (balance reads and debits under row lock)
//! - [`withdraw`] - Withdrawal records, the orchestration protocol, and the
//!   scheduled dispatch loop
//! - [`notify`] - Best-effort email notification after a successful debit
//! - [`gateway`] - Axum HTTP surface
//! - [`config`] / [`logging`] / [`db`] - service wiring

pub mod config;
pub mod db;
pub mod logging;

pub mod account;
pub mod withdraw;

pub mod notify;

pub mod gateway;
