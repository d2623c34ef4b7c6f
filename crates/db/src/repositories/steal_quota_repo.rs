//! Repository for the `steal_attempts` quota table.
//!
//! One row per (actor, target, calendar day). The daily cap reads today's
//! bucket; the inter-target cooldown reads the most recent attempt across
//! buckets so it survives the midnight rollover.

use sqlx::PgPool;

use crate::models::QuotaStatus;

/// Provides attempt-quota bookkeeping for the anti-abuse gate.
pub struct StealQuotaRepo;

impl StealQuotaRepo {
    /// Current standing for an (actor, target) pair.
    pub async fn status(
        pool: &PgPool,
        actor_id: &str,
        target_id: &str,
    ) -> Result<QuotaStatus, sqlx::Error> {
        let row: (Option<i32>, Option<chrono::DateTime<chrono::Utc>>) = sqlx::query_as(
            "SELECT \
                 (SELECT attempts FROM steal_attempts \
                  WHERE actor_id = $1 AND target_id = $2 AND day = CURRENT_DATE), \
                 (SELECT MAX(last_attempt_at) FROM steal_attempts \
                  WHERE actor_id = $1 AND target_id = $2)",
        )
        .bind(actor_id)
        .bind(target_id)
        .fetch_one(pool)
        .await?;

        Ok(QuotaStatus {
            attempts_today: row.0.unwrap_or(0),
            last_attempt_at: row.1,
        })
    }

    /// Record one attempt: increment today's bucket and stamp the
    /// last-attempt time.
    pub async fn record(
        pool: &PgPool,
        actor_id: &str,
        target_id: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO steal_attempts (actor_id, target_id, day, attempts, last_attempt_at) \
             VALUES ($1, $2, CURRENT_DATE, 1, NOW()) \
             ON CONFLICT (actor_id, target_id, day) DO UPDATE SET \
                 attempts = steal_attempts.attempts + 1, \
                 last_attempt_at = NOW()",
        )
        .bind(actor_id)
        .bind(target_id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Drop day buckets older than yesterday. Called opportunistically;
    /// stale rows only cost space, never correctness.
    pub async fn purge_stale(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM steal_attempts WHERE day < CURRENT_DATE - 1",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
