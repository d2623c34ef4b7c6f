//! Atomic economic primitives.
//!
//! These are the delta-application functions every other mutation composes
//! with. They are pure (no I/O, no clock) and must only be applied to a farm
//! loaded under its exclusive lock.

use crate::config::LevelCurve;
use crate::farm::Farm;

// ---------------------------------------------------------------------------
// Coins
// ---------------------------------------------------------------------------

/// Apply a coin delta, clamping the balance at zero.
///
/// Returns the *actual* change applied: `new_balance - old_balance`. An
/// over-deduction clamps rather than fails; callers that need a hard
/// "insufficient funds" outcome must pre-check the balance themselves.
///
/// Lifetime counters are updated by the sign of the actual change.
pub fn apply_coin_delta(farm: &mut Farm, amount: i64) -> i64 {
    let new_balance = farm.coins.saturating_add(amount).max(0);
    let actual = new_balance - farm.coins;
    if actual > 0 {
        farm.stats.total_earned += actual;
    } else {
        farm.stats.total_spent += -actual;
    }
    farm.coins = new_balance;
    actual
}

// ---------------------------------------------------------------------------
// Experience
// ---------------------------------------------------------------------------

/// Result of an experience delta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelReport {
    pub new_level: i32,
    pub leveled_up: bool,
    /// Unlock ids from every threshold crossed by this delta, ascending.
    pub unlocks: Vec<String>,
}

/// Add experience and recompute the level from the configured curve.
///
/// The level is the highest configured threshold at or below the new
/// experience total. When the level increases, coin rewards are granted
/// through [`apply_coin_delta`] and unlock ids are collected for **every**
/// threshold crossed, not just the final level.
///
/// Experience never goes negative; a negative delta clamps at zero and
/// never demotes the level (levels are monotonic in this game).
pub fn apply_experience_delta(farm: &mut Farm, amount: i64, curve: &LevelCurve) -> LevelReport {
    farm.experience = farm.experience.saturating_add(amount).max(0);

    let old_level = farm.level;
    let computed = curve.level_for(farm.experience);
    let new_level = computed.max(old_level);
    farm.level = new_level;

    let mut unlocks = Vec::new();
    if new_level > old_level {
        for step in curve.steps_crossed(old_level, new_level) {
            if step.coin_reward > 0 {
                apply_coin_delta(farm, step.coin_reward);
            }
            if let Some(unlock) = &step.unlock {
                unlocks.push(unlock.clone());
            }
        }
    }

    LevelReport {
        new_level,
        leveled_up: new_level > old_level,
        unlocks,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
