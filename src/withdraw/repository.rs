//! Repository layer for withdrawal records and their PIX destinations

use super::models::{PixDestination, PixKeyType, WithdrawMethod, Withdrawal};
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

/// Withdrawal repository.
///
/// All lifecycle writes go through [`WithdrawRepository::mark_processed`];
/// no other statement touches `done`/`error`.
pub struct WithdrawRepository;

impl WithdrawRepository {
    /// Insert a pending withdrawal. The id is generated by the caller so it
    /// is known before commit and usable for correlation.
    pub async fn insert(
        conn: &mut PgConnection,
        id: &str,
        account_id: &str,
        method: WithdrawMethod,
        amount: Decimal,
        scheduled_for: Option<NaiveDateTime>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO account_withdraw
               (id, account_id, method, amount, scheduled, scheduled_for, done, error)
               VALUES ($1, $2, $3, $4, $5, $6, FALSE, FALSE)"#,
        )
        .bind(id)
        .bind(account_id)
        .bind(method.to_string())
        .bind(amount)
        .bind(scheduled_for.is_some())
        .bind(scheduled_for)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Insert the PIX destination sub-record alongside its withdrawal
    pub async fn insert_pix(
        conn: &mut PgConnection,
        withdraw_id: &str,
        kind: PixKeyType,
        key: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"INSERT INTO account_withdraw_pix (account_withdraw_id, type, key)
               VALUES ($1, $2, $3)"#,
        )
        .bind(withdraw_id)
        .bind(kind.to_string())
        .bind(key)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Get a withdrawal by id
    pub async fn find(pool: &PgPool, id: &str) -> Result<Option<Withdrawal>, sqlx::Error> {
        sqlx::query_as::<_, Withdrawal>(
            r#"SELECT id, account_id, method, amount, scheduled, scheduled_for,
                      done, error, error_reason, created_at, updated_at
               FROM account_withdraw WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Get the PIX destination for a withdrawal
    pub async fn find_pix(
        pool: &PgPool,
        withdraw_id: &str,
    ) -> Result<Option<PixDestination>, sqlx::Error> {
        sqlx::query_as::<_, PixDestination>(
            r#"SELECT account_withdraw_id, type, key, created_at
               FROM account_withdraw_pix WHERE account_withdraw_id = $1"#,
        )
        .bind(withdraw_id)
        .fetch_optional(pool)
        .await
    }

    /// Re-read a withdrawal under an exclusive row lock inside the caller's
    /// transaction. A second claimant blocks here until the first commits,
    /// then observes `done = true` and backs off.
    pub async fn lock_by_id(
        conn: &mut PgConnection,
        id: &str,
    ) -> Result<Option<Withdrawal>, sqlx::Error> {
        sqlx::query_as::<_, Withdrawal>(
            r#"SELECT id, account_id, method, amount, scheduled, scheduled_for,
                      done, error, error_reason, created_at, updated_at
               FROM account_withdraw WHERE id = $1
               FOR UPDATE"#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
    }

    /// Claim one due scheduled withdrawal under an exclusive row lock.
    ///
    /// `now_local` must be the comparison clock already normalized into the
    /// schedule offset. Candidates are ordered by `(scheduled_for, id)` so
    /// every dispatcher instance attempts locks in the same global order;
    /// `SKIP LOCKED` makes contending instances skip a claimed row instead
    /// of blocking on it.
    pub async fn claim_due(
        conn: &mut PgConnection,
        now_local: NaiveDateTime,
    ) -> Result<Option<Withdrawal>, sqlx::Error> {
        sqlx::query_as::<_, Withdrawal>(
            r#"SELECT id, account_id, method, amount, scheduled, scheduled_for,
                      done, error, error_reason, created_at, updated_at
               FROM account_withdraw
               WHERE scheduled AND NOT done AND scheduled_for <= $1
               ORDER BY scheduled_for ASC, id ASC
               LIMIT 1
               FOR UPDATE SKIP LOCKED"#,
        )
        .bind(now_local)
        .fetch_optional(conn)
        .await
    }

    /// The single terminal write: flips `done` and records the business
    /// outcome. `updated_at` becomes the processing timestamp.
    pub async fn mark_processed(
        conn: &mut PgConnection,
        id: &str,
        error: bool,
        error_reason: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"UPDATE account_withdraw
               SET done = TRUE, error = $1, error_reason = $2, updated_at = NOW()
               WHERE id = $3"#,
        )
        .bind(error)
        .bind(error_reason)
        .bind(id)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
