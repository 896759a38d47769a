//! Scheduled withdrawal dispatcher
//!
//! The perpetual service and the one-shot CLI trigger share the identical
//! claim-and-execute routine in [`WithdrawService::process_scheduled`];
//! only the outer repetition policy lives here.

use std::sync::Arc;
use tokio::time::{Duration, sleep};
use tracing::{error, info};

use super::error::WithdrawError;
use super::service::WithdrawService;

/// Long-lived background dispatcher for scheduled withdrawals.
///
/// May be replicated across worker processes; coordination happens entirely
/// through row locks in the claim query, never in-process.
pub struct ScheduledDispatcher {
    service: Arc<WithdrawService>,
    poll_interval: Duration,
}

impl ScheduledDispatcher {
    pub fn new(service: Arc<WithdrawService>, poll_interval: Duration) -> Self {
        Self {
            service,
            poll_interval,
        }
    }

    /// Single pass: drain the due backlog and report how many withdrawals
    /// reached a terminal state.
    pub async fn run_once(&self) -> Result<u64, WithdrawError> {
        self.service.process_scheduled().await
    }

    /// Run forever. Per-pass errors are logged and the next tick proceeds.
    pub async fn run(&self) {
        info!(
            "Scheduled withdrawal dispatcher started (interval: {:?})",
            self.poll_interval
        );

        loop {
            match self.run_once().await {
                Ok(0) => {}
                Ok(n) => info!("Dispatch pass processed {} withdrawal(s)", n),
                Err(e) => error!(error = %e, "dispatch pass failed"),
            }

            sleep(self.poll_interval).await;
        }
    }
}
