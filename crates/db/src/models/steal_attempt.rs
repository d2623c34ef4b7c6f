//! Query results for the `steal_attempts` quota table.

use grange_core::types::Timestamp;

/// Current quota standing for one (actor, target) pair.
#[derive(Debug, Clone)]
pub struct QuotaStatus {
    /// Attempts recorded in today's calendar-day bucket.
    pub attempts_today: i32,
    /// Most recent attempt against this target across all day buckets.
    pub last_attempt_at: Option<Timestamp>,
}
