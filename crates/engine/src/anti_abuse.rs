//! Per-(actor, target) attempt quotas and inter-target cooldowns.

use chrono::Utc;
use grange_db::repositories::StealQuotaRepo;
use sqlx::PgPool;

use crate::error::EngineError;

/// Why an attempt was refused by the quota gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDenial {
    /// The inter-target cooldown since the last attempt is still running.
    TargetCooldownActive,
    /// Today's attempt count against this target reached the daily cap.
    QuotaExhausted,
}

/// Outcome of [`AntiAbuseTracker::check_and_record`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    Allowed,
    Denied {
        reason: QuotaDenial,
        /// Milliseconds until the gate opens, when that is knowable
        /// (`None` for an exhausted daily quota).
        remaining_ms: Option<i64>,
    },
}

/// Daily-quota and frequency gate for contested transfers.
#[derive(Debug, Clone)]
pub struct AntiAbuseTracker {
    pool: PgPool,
}

impl AntiAbuseTracker {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Evaluate the gates in order (inter-target cooldown, then daily cap)
    /// and record the attempt only when allowed.
    ///
    /// Contract: call this only after every other eligibility check has
    /// already passed. Attempts rejected for unrelated reasons (nothing
    /// to steal, target protected) must never consume quota, and that is
    /// guaranteed by call placement, not by this method.
    pub async fn check_and_record(
        &self,
        actor_id: &str,
        target_id: &str,
        max_per_day: i32,
        inter_target_cooldown_ms: i64,
    ) -> Result<QuotaDecision, EngineError> {
        let status = StealQuotaRepo::status(&self.pool, actor_id, target_id).await?;
        let now = Utc::now();

        if let Some(last) = status.last_attempt_at {
            let since_ms = (now - last).num_milliseconds();
            if since_ms < inter_target_cooldown_ms {
                return Ok(QuotaDecision::Denied {
                    reason: QuotaDenial::TargetCooldownActive,
                    remaining_ms: Some(inter_target_cooldown_ms - since_ms),
                });
            }
        }

        if status.attempts_today >= max_per_day {
            return Ok(QuotaDecision::Denied {
                reason: QuotaDenial::QuotaExhausted,
                remaining_ms: None,
            });
        }

        StealQuotaRepo::record(&self.pool, actor_id, target_id).await?;
        // Cheap housekeeping while we are here; stale buckets only cost
        // space, never correctness.
        StealQuotaRepo::purge_stale(&self.pool).await?;

        Ok(QuotaDecision::Allowed)
    }
}
