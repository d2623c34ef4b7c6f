//! Lock-guarded entity access.
//!
//! [`EntityStore::with_lock`] and [`EntityStore::with_multi_lock`] are the
//! only sanctioned mutation paths: they load-fresh and save inside a held
//! lock with guaranteed release, and surface [`EngineError::LockTimeout`]
//! when the TTL elapsed before the work finished. Mutating a farm outside
//! these helpers is a contract violation that breaks every entity
//! invariant.

use std::future::Future;
use std::sync::Arc;

use grange_core::config::GameConfig;
use grange_core::farm::Farm;
use grange_db::repositories::FarmRepo;
use sqlx::{PgPool, Postgres, Transaction};

use crate::error::EngineError;
use crate::lock::LockManager;

/// Lock-marker namespace for farm entities.
fn entity_lock_name(id: &str) -> String {
    format!("farm:{id}")
}

/// Load/save access to farm entities plus the transactional lock helpers.
///
/// Cheap to clone; holds only the pool handle, the lock manager, and the
/// immutable config. Mutable economic state is never cached here; the
/// store re-reads the database on every transaction, because caching
/// across requests would reintroduce exactly the races the locks prevent.
#[derive(Debug, Clone)]
pub struct EntityStore {
    pool: PgPool,
    locks: LockManager,
    config: Arc<GameConfig>,
}

impl EntityStore {
    pub fn new(pool: PgPool, config: Arc<GameConfig>) -> Self {
        let locks = LockManager::new(pool.clone());
        Self { pool, locks, config }
    }

    /// The lock manager this store serializes through.
    pub fn locks(&self) -> &LockManager {
        &self.locks
    }

    /// Load a farm by id.
    pub async fn get(&self, id: &str) -> Result<Option<Farm>, EngineError> {
        Ok(FarmRepo::get(&self.pool, id).await?)
    }

    /// Load a farm, lazily creating it with configured defaults.
    pub async fn get_or_create(&self, id: &str) -> Result<Farm, EngineError> {
        Ok(FarmRepo::get_or_create(
            &self.pool,
            id,
            self.config.starting_coins,
            self.config.starting_plots,
        )
        .await?)
    }

    /// Durably persist the full entity state. Must only be called while
    /// the entity's lock is held (i.e. from inside a `with_lock` body).
    pub async fn save(&self, farm: &Farm) -> Result<(), EngineError> {
        Ok(FarmRepo::save(&self.pool, farm).await?)
    }

    /// Open a transaction on the backing store, for writes that span
    /// several rows and must commit or roll back as one unit. Same
    /// contract as [`EntityStore::save`]: only while the relevant entity
    /// locks are held.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, EngineError> {
        Ok(self.pool.begin().await?)
    }

    /// Run `body` while holding the entity's exclusive lock.
    ///
    /// The lock is released on every path. If the TTL elapsed before
    /// `body` finished, the result is `LockTimeout` even when `body`
    /// succeeded, since another worker may already have observed or overwritten
    /// the state.
    pub async fn with_lock<T, F, Fut>(&self, id: &str, body: F) -> Result<T, EngineError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, EngineError>>,
    {
        self.with_multi_lock(&[id], body).await
    }

    /// Run `body` while holding the exclusive locks of every id, acquired
    /// in canonical order as one atomic unit.
    pub async fn with_multi_lock<T, F, Fut>(&self, ids: &[&str], body: F) -> Result<T, EngineError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, EngineError>>,
    {
        let names: Vec<String> = ids.iter().map(|id| entity_lock_name(id)).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let held = self.locks.acquire_many(&name_refs, self.config.lock_ttl_ms).await?;

        let outcome = body().await;

        // Check liveness before releasing: a completed body whose lock
        // already expired must not be reported as success.
        let lost = match &outcome {
            Ok(_) => self.locks.find_lost(&held).await,
            Err(_) => Ok(None),
        };
        self.locks.release_many(&held).await;

        match lost {
            Ok(Some(name)) => Err(EngineError::LockTimeout { name }),
            Ok(None) => outcome,
            Err(err) => Err(err),
        }
    }
}
