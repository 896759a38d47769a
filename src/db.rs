//! Database connection management

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// PostgreSQL database connection pool
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        tracing::info!("PostgreSQL connection pool established");
        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Create the account/withdrawal tables if they do not exist yet
    pub async fn init_schema(&self) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS account (
                id         TEXT PRIMARY KEY,
                name       TEXT NOT NULL DEFAULT '',
                balance    NUMERIC(15,2) NOT NULL CHECK (balance >= 0),
                created_at TIMESTAMP NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMP NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            -- account_id is a non-owning reference: a withdrawal outlives
            -- its account and reaches a terminal error state instead.
            CREATE TABLE IF NOT EXISTS account_withdraw (
                id            TEXT PRIMARY KEY,
                account_id    TEXT NOT NULL,
                method        TEXT NOT NULL,
                amount        NUMERIC(15,2) NOT NULL,
                scheduled     BOOLEAN NOT NULL DEFAULT FALSE,
                scheduled_for TIMESTAMP,
                done          BOOLEAN NOT NULL DEFAULT FALSE,
                error         BOOLEAN NOT NULL DEFAULT FALSE,
                error_reason  TEXT,
                created_at    TIMESTAMP NOT NULL DEFAULT NOW(),
                updated_at    TIMESTAMP NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        // Partial index keeps the dispatcher claim scan cheap once the
        // table accumulates processed rows.
        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_account_withdraw_due
            ON account_withdraw (scheduled_for, id)
            WHERE scheduled AND NOT done
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS account_withdraw_pix (
                account_withdraw_id TEXT NOT NULL UNIQUE REFERENCES account_withdraw(id),
                type                TEXT NOT NULL,
                key                 TEXT NOT NULL,
                created_at          TIMESTAMP NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Database schema initialized");
        Ok(())
    }
}
