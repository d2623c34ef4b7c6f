//! Repository for the `action_cooldowns` table.

use sqlx::{PgExecutor, PgPool};

/// Provides timed-gate operations for per-entity actions.
pub struct CooldownRepo;

impl CooldownRepo {
    /// Arm (or re-arm) a cooldown: `expires_at = NOW() + duration`.
    ///
    /// Takes any executor so the arm can join a caller's transaction.
    pub async fn arm(
        executor: impl PgExecutor<'_>,
        farm_id: &str,
        action: &str,
        duration_ms: i64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO action_cooldowns (farm_id, action, expires_at) \
             VALUES ($1, $2, NOW() + make_interval(secs => $3::float8 / 1000.0)) \
             ON CONFLICT (farm_id, action) DO UPDATE SET \
                 expires_at = EXCLUDED.expires_at",
        )
        .bind(farm_id)
        .bind(action)
        .bind(duration_ms as f64)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Milliseconds remaining on the cooldown, or 0 when expired or absent.
    ///
    /// Expired rows self-clean: reading one deletes it.
    pub async fn remaining_ms(
        pool: &PgPool,
        farm_id: &str,
        action: &str,
    ) -> Result<i64, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT CEIL(EXTRACT(EPOCH FROM (expires_at - NOW())) * 1000)::BIGINT \
             FROM action_cooldowns \
             WHERE farm_id = $1 AND action = $2 AND expires_at > NOW()",
        )
        .bind(farm_id)
        .bind(action)
        .fetch_optional(pool)
        .await?;

        if row.is_none() {
            sqlx::query(
                "DELETE FROM action_cooldowns \
                 WHERE farm_id = $1 AND action = $2 AND expires_at <= NOW()",
            )
            .bind(farm_id)
            .bind(action)
            .execute(pool)
            .await?;
        }

        Ok(row.map(|(ms,)| ms.max(0)).unwrap_or(0))
    }
}
