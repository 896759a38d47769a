use std::sync::Arc;

use crate::db::Database;
use crate::withdraw::WithdrawService;

/// Shared gateway state
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL database (health checks)
    pub db: Arc<Database>,
    /// Withdrawal orchestrator
    pub service: Arc<WithdrawService>,
}

impl AppState {
    pub fn new(db: Arc<Database>, service: Arc<WithdrawService>) -> Self {
        Self { db, service }
    }
}
