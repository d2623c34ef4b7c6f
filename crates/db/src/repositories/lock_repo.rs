//! Repository for the `entity_locks` table.
//!
//! Acquisition is a single atomic check-and-set statement: the upsert only
//! fires when the existing row is expired, so two racing acquirers can
//! never both walk away holding the same name.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::LockRow;

/// Provides atomic acquire/release operations for named exclusive locks.
pub struct LockRepo;

impl LockRepo {
    /// Try to acquire `name` for `ttl_ms` milliseconds.
    ///
    /// Returns `true` when the lock was taken (fresh or reclaimed from an
    /// expired holder), `false` when a live holder exists.
    pub async fn try_acquire(
        pool: &PgPool,
        name: &str,
        token: Uuid,
        ttl_ms: i64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO entity_locks (name, holder_token, expires_at) \
             VALUES ($1, $2, NOW() + make_interval(secs => $3::float8 / 1000.0)) \
             ON CONFLICT (name) DO UPDATE SET \
                 holder_token = EXCLUDED.holder_token, \
                 expires_at = EXCLUDED.expires_at \
             WHERE entity_locks.expires_at <= NOW()",
        )
        .bind(name)
        .bind(token)
        .bind(ttl_ms as f64)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Release `name` if and only if `token` still matches the live holder.
    ///
    /// Returns `false` when the token no longer matches, i.e. the lock expired
    /// and was re-acquired by someone else, and must not be torn down.
    pub async fn release(pool: &PgPool, name: &str, token: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM entity_locks WHERE name = $1 AND holder_token = $2",
        )
        .bind(name)
        .bind(token)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether `token` is still the live (unexpired) holder of `name`.
    pub async fn is_held(pool: &PgPool, name: &str, token: Uuid) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS ( \
                 SELECT 1 FROM entity_locks \
                 WHERE name = $1 AND holder_token = $2 AND expires_at > NOW() \
             )",
        )
        .bind(name)
        .bind(token)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Load a lock marker by name. Test and diagnostics helper.
    pub async fn find(pool: &PgPool, name: &str) -> Result<Option<LockRow>, sqlx::Error> {
        sqlx::query_as::<_, LockRow>(
            "SELECT name, holder_token, expires_at FROM entity_locks WHERE name = $1",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
    }
}
