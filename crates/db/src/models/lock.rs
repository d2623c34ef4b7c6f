//! Row model for the `entity_locks` table.

use grange_core::types::Timestamp;
use sqlx::FromRow;
use uuid::Uuid;

/// A lock marker. A row whose `expires_at` has passed is dead: the next
/// acquire overwrites it in place.
#[derive(Debug, Clone, FromRow)]
pub struct LockRow {
    pub name: String,
    pub holder_token: Uuid,
    pub expires_at: Timestamp,
}
