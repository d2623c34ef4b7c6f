//! Per-entity, per-action timed gates.

use grange_db::repositories::CooldownRepo;
use sqlx::PgPool;

use crate::error::EngineError;

/// Readiness of one action gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownState {
    pub ready: bool,
    /// `max(0, expiry - now)` in milliseconds; 0 when ready.
    pub remaining_ms: i64,
}

/// Timed gate tracker. Records self-expire after their duration; an
/// elapsed gate is indistinguishable from one that never existed.
#[derive(Debug, Clone)]
pub struct CooldownTracker {
    pool: PgPool,
}

impl CooldownTracker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Whether `action` is ready for `farm_id`, with remaining time.
    pub async fn is_ready(&self, farm_id: &str, action: &str) -> Result<CooldownState, EngineError> {
        let remaining_ms = CooldownRepo::remaining_ms(&self.pool, farm_id, action).await?;
        Ok(CooldownState { ready: remaining_ms == 0, remaining_ms })
    }

    /// Arm the gate: `expiry = now + duration_ms`.
    pub async fn arm(&self, farm_id: &str, action: &str, duration_ms: i64) -> Result<(), EngineError> {
        CooldownRepo::arm(&self.pool, farm_id, action, duration_ms).await?;
        Ok(())
    }
}
