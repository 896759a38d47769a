//! Withdrawal processing engine
//!
//! A withdrawal is created in a single transaction that locks the account
//! row, validates funds, and either debits immediately or leaves the record
//! pending for the scheduled dispatcher. The terminal transition to
//! `done = true` happens exactly once, guarded by a row lock on the
//! withdrawal itself.

pub mod dispatcher;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use dispatcher::ScheduledDispatcher;
pub use error::WithdrawError;
pub use models::{NewWithdrawal, PixDestination, PixKey, PixKeyType, WithdrawMethod, Withdrawal};
pub use repository::WithdrawRepository;
pub use service::{ProcessOutcome, WithdrawService};
