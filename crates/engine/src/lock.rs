//! Named exclusive locks over the shared store.
//!
//! The database is the sole serialization mechanism: these locks must hold
//! under true multi-process parallelism, so no in-process mutex appears
//! anywhere in this crate. Acquisition never blocks or queues: a busy
//! lock returns [`EngineError::LockBusy`] immediately, keeping latency
//! predictable and denying a popular victim's lock queue any chance to
//! become a denial-of-service vector.

use grange_db::repositories::LockRepo;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::EngineError;

/// A successfully acquired lock: the name plus the holder token that must
/// accompany the release.
#[derive(Debug, Clone)]
pub struct HeldLock {
    pub name: String,
    pub token: Uuid,
}

/// Distributed lock manager.
///
/// Every lock carries a TTL bounding worst-case unavailability after a
/// crashed holder; an unreleased lock is a liveness hazard, not a
/// correctness one.
#[derive(Debug, Clone)]
pub struct LockManager {
    pool: PgPool,
}

impl LockManager {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Acquire `name` for `ttl_ms`, or fail immediately with `LockBusy`.
    pub async fn acquire(&self, name: &str, ttl_ms: i64) -> Result<HeldLock, EngineError> {
        let token = Uuid::new_v4();
        let taken = LockRepo::try_acquire(&self.pool, name, token, ttl_ms).await?;
        if !taken {
            return Err(EngineError::LockBusy { name: name.to_string() });
        }
        tracing::debug!(name, %token, ttl_ms, "Lock acquired");
        Ok(HeldLock { name: name.to_string(), token })
    }

    /// Release a held lock.
    ///
    /// A token that no longer matches the live holder (the lock expired
    /// and was re-acquired) is a logged no-op, never an error: tearing
    /// down the new holder's lock would be far worse than leaving ours to
    /// its TTL.
    pub async fn release(&self, lock: &HeldLock) -> Result<(), EngineError> {
        let released = LockRepo::release(&self.pool, &lock.name, lock.token).await?;
        if released {
            tracing::debug!(name = %lock.name, "Lock released");
        } else {
            tracing::warn!(
                name = %lock.name,
                token = %lock.token,
                "Release skipped: token no longer holds the lock",
            );
        }
        Ok(())
    }

    /// Acquire several names as one atomic unit.
    ///
    /// Names are deduplicated and sorted into canonical (lexicographic)
    /// order before acquisition, strictly in that order. Two overlapping
    /// calls therefore always attempt their common names in the same
    /// relative order, so no acquisition cycle can form. This ordering
    /// is the sole deadlock-avoidance mechanism. On any failure,
    /// everything acquired so far is released and the call fails as a
    /// unit with `LockBusy`.
    pub async fn acquire_many(
        &self,
        names: &[&str],
        ttl_ms: i64,
    ) -> Result<Vec<HeldLock>, EngineError> {
        let mut ordered: Vec<&str> = names.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        let mut held: Vec<HeldLock> = Vec::with_capacity(ordered.len());
        for name in ordered {
            match self.acquire(name, ttl_ms).await {
                Ok(lock) => held.push(lock),
                Err(err) => {
                    self.release_many(&held).await;
                    return Err(err);
                }
            }
        }
        Ok(held)
    }

    /// Release a set of held locks, most recently acquired first.
    ///
    /// Release failures are logged and swallowed: the TTL makes an
    /// unreleased lock self-expire, and the caller's own outcome must not
    /// be clobbered by a cleanup hiccup.
    pub async fn release_many(&self, locks: &[HeldLock]) {
        for lock in locks.iter().rev() {
            if let Err(err) = self.release(lock).await {
                tracing::warn!(name = %lock.name, error = %err, "Lock release failed");
            }
        }
    }

    /// The name of the first lock in the set no longer live with its
    /// original token, if any.
    ///
    /// Backs the `LockTimeout` distinction: a transaction that outlived
    /// its TTL must surface as such, never as silent success.
    pub async fn find_lost(&self, locks: &[HeldLock]) -> Result<Option<String>, EngineError> {
        for lock in locks {
            if !LockRepo::is_held(&self.pool, &lock.name, lock.token).await? {
                return Ok(Some(lock.name.clone()));
            }
        }
        Ok(None)
    }
}
