//! Row model for the `action_cooldowns` table.

use grange_core::types::Timestamp;
use sqlx::FromRow;

/// A per-entity, per-action cooldown record.
#[derive(Debug, Clone, FromRow)]
pub struct CooldownRow {
    pub farm_id: String,
    pub action: String,
    pub expires_at: Timestamp,
}
