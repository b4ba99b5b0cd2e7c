//! Repository for the `otp_logs` table.

use sqlx::PgPool;
use ucarx_core::types::{DbId, Timestamp};

use crate::models::otp::{CreateOtpLog, OtpLog, OtpReason};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, channel, code_hash, expires_at, consumed_at, reason, created_at";

/// Provides persistence operations for OTP challenges.
pub struct OtpRepo;

impl OtpRepo {
    /// Insert a new OTP row. Prior rows are never mutated; superseded codes
    /// simply age out via `expires_at`.
    pub async fn create(pool: &PgPool, input: &CreateOtpLog) -> Result<OtpLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO otp_logs (user_id, channel, code_hash, expires_at, reason)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OtpLog>(&query)
            .bind(input.user_id)
            .bind(&input.channel)
            .bind(&input.code_hash)
            .bind(input.expires_at)
            .bind(input.reason.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find the most recently created OTP for the user that is unconsumed
    /// and not yet expired.
    pub async fn find_latest_pending(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<OtpLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM otp_logs
             WHERE user_id = $1 AND consumed_at IS NULL AND expires_at >= NOW()
             ORDER BY created_at DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, OtpLog>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Count OTP rows with the given reason issued to the user since the
    /// given instant. Drives the hourly send rate limit; registration codes
    /// carry a different reason and so never count against it.
    pub async fn count_since(
        pool: &PgPool,
        user_id: DbId,
        reason: OtpReason,
        since: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM otp_logs
             WHERE user_id = $1 AND reason = $2 AND created_at >= $3",
        )
        .bind(user_id)
        .bind(reason.as_str())
        .bind(since)
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Atomically consume an OTP and stamp the owning user's verification and
    /// last-login timestamps.
    ///
    /// The consume step is a conditional update (`consumed_at IS NULL`), so
    /// when two requests race on the same row exactly one sees a row
    /// affected; the loser gets `Ok(false)` and the whole transaction rolls
    /// back. `phone_verified_at` is set only the first time, never cleared.
    pub async fn consume_and_stamp_user(
        pool: &PgPool,
        otp_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let consumed = sqlx::query(
            "UPDATE otp_logs SET consumed_at = NOW() WHERE id = $1 AND consumed_at IS NULL",
        )
        .bind(otp_id)
        .execute(&mut *tx)
        .await?;

        if consumed.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query(
            "UPDATE users SET
                phone_verified_at = COALESCE(phone_verified_at, NOW()),
                last_login_at = NOW(),
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(true)
    }
}
