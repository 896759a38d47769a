//! Outbound notification
//!
//! Transaction-decoupled side effects: invoked only after the owning
//! database transaction has committed, and never allowed to fail the
//! caller.

pub mod email;

pub use email::EmailNotifier;
