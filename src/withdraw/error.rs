use thiserror::Error;

#[derive(Debug, Error)]
pub enum WithdrawError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Account not found")]
    AccountNotFound,

    #[error("Insufficient funds")]
    InsufficientFunds,
}
