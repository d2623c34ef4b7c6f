//! Validated game-balance configuration.
//!
//! The configuration provider (file parsing, admin overrides) is external;
//! this core receives an already-parsed [`GameConfig`], validates it once at
//! startup, and treats it as immutable from then on. Business logic never
//! probes optional fields or falls back silently; a bad config fails fast
//! with [`CoreError::Config`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::farm::QualityTier;

// ---------------------------------------------------------------------------
// Level curve
// ---------------------------------------------------------------------------

/// One level step: the experience floor to reach it, the coin reward paid
/// on reaching it, and the feature it unlocks (if any).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelStep {
    pub level: i32,
    pub min_experience: i64,
    pub coin_reward: i64,
    pub unlock: Option<String>,
}

/// The configured level curve, ascending in both level and experience.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelCurve {
    pub steps: Vec<LevelStep>,
}

impl LevelCurve {
    /// The highest configured level whose experience floor is `<= experience`.
    pub fn level_for(&self, experience: i64) -> i32 {
        self.steps
            .iter()
            .rev()
            .find(|s| s.min_experience <= experience)
            .map(|s| s.level)
            .unwrap_or(1)
    }

    /// Steps with `old_level < level <= new_level`, in ascending order.
    /// Every threshold crossed by one delta, not just the final one.
    pub fn steps_crossed(&self, old_level: i32, new_level: i32) -> Vec<&LevelStep> {
        self.steps
            .iter()
            .filter(|s| s.level > old_level && s.level <= new_level)
            .collect()
    }

    fn validate(&self) -> Result<(), CoreError> {
        if self.steps.is_empty() {
            return Err(CoreError::Config("level curve must not be empty".into()));
        }
        for pair in self.steps.windows(2) {
            if pair[1].level <= pair[0].level || pair[1].min_experience <= pair[0].min_experience {
                return Err(CoreError::Config(format!(
                    "level curve must be strictly ascending, got level {} after {}",
                    pair[1].level, pair[0].level
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Steal balance
// ---------------------------------------------------------------------------

/// Constants governing the steal protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StealConfig {
    /// Base success rate in percentage points.
    pub base_success_rate: f64,
    /// Per-level-difference factor. Each level of difference between actor
    /// and target shifts the success rate by `level_factor * 10` points.
    pub level_factor: f64,
    /// Lower clamp for the success rate, percentage points.
    pub min_success_rate: f64,
    /// Upper clamp for the success rate, percentage points.
    pub max_success_rate: f64,
    /// Fraction of a plot's base yield paid out as loot.
    pub reward_rate: f64,
    /// Upper clamp for `reward_rate`.
    pub reward_max_rate: f64,
    /// Uniform band the per-plot random yield factor is drawn from.
    pub random_factor_band: (f64, f64),
    /// Growth progress contributes to loot up to this cap.
    pub growth_cap: f64,
    /// How long a resolved attempt locks out the actor's next attempt.
    pub steal_cooldown_ms: i64,
    /// Grace period granted to a victim after a successful steal.
    pub protection_duration_ms: i64,
    /// Daily attempt cap per (actor, target) pair, independent of outcome.
    pub max_attempts_per_target_per_day: i32,
    /// Minimum spacing between attempts against the same target.
    pub inter_target_cooldown_ms: i64,
    /// Experience granted to the actor on a successful steal.
    pub steal_success_xp: i64,
}

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// The full validated configuration consumed by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub steal: StealConfig,
    pub levels: LevelCurve,
    /// Crop item id -> base yield per mature plot.
    pub crop_base_yield: BTreeMap<String, i64>,
    /// Base yield for crops missing from `crop_base_yield`.
    pub default_base_yield: i64,
    /// Total inventory units a farm can hold.
    pub inventory_capacity: i64,
    pub starting_coins: i64,
    pub starting_plots: u32,
    /// TTL on every entity lock, bounding unavailability after a crash.
    pub lock_ttl_ms: i64,
}

impl GameConfig {
    /// Check every cross-field constraint. Call once at startup; a failure
    /// here means the deployment is misconfigured and must not serve.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.levels.validate()?;

        let s = &self.steal;
        if s.min_success_rate > s.max_success_rate {
            return Err(CoreError::Config(
                "min_success_rate must not exceed max_success_rate".into(),
            ));
        }
        if !(0.0..=100.0).contains(&s.min_success_rate)
            || !(0.0..=100.0).contains(&s.max_success_rate)
        {
            return Err(CoreError::Config(
                "success rate bounds must lie in 0..=100".into(),
            ));
        }
        if s.reward_rate < 0.0 || s.reward_max_rate < 0.0 {
            return Err(CoreError::Config("reward rates must be non-negative".into()));
        }
        let (lo, hi) = s.random_factor_band;
        if lo <= 0.0 || hi < lo {
            return Err(CoreError::Config(
                "random_factor_band must be a positive, ordered interval".into(),
            ));
        }
        if s.growth_cap < 1.0 {
            return Err(CoreError::Config("growth_cap must be at least 1.0".into()));
        }
        if s.steal_cooldown_ms <= 0 || s.protection_duration_ms <= 0 {
            return Err(CoreError::Config(
                "steal cooldown and protection durations must be positive".into(),
            ));
        }
        if s.max_attempts_per_target_per_day <= 0 {
            return Err(CoreError::Config(
                "max_attempts_per_target_per_day must be positive".into(),
            ));
        }
        if self.inventory_capacity <= 0 {
            return Err(CoreError::Config("inventory_capacity must be positive".into()));
        }
        if self.lock_ttl_ms <= 0 {
            return Err(CoreError::Config("lock_ttl_ms must be positive".into()));
        }
        Ok(())
    }

    /// Base yield for a crop, falling back to the configured default for
    /// crops absent from the table.
    pub fn base_yield(&self, crop: &str) -> i64 {
        self.crop_base_yield
            .get(crop)
            .copied()
            .unwrap_or(self.default_base_yield)
    }

    /// Yield multiplier for a plot quality tier.
    pub fn quality_multiplier(&self, tier: QualityTier) -> f64 {
        match tier {
            QualityTier::Normal => 1.0,
            QualityTier::Silver => 1.25,
            QualityTier::Gold => 1.5,
        }
    }
}

impl Default for GameConfig {
    /// Shipped balance values. Deployments override via the external
    /// configuration provider before calling [`GameConfig::validate`].
    fn default() -> Self {
        Self {
            steal: StealConfig {
                base_success_rate: 50.0,
                level_factor: 0.5,
                min_success_rate: 10.0,
                max_success_rate: 90.0,
                reward_rate: 0.3,
                reward_max_rate: 0.5,
                random_factor_band: (0.8, 1.2),
                growth_cap: 1.5,
                steal_cooldown_ms: 5 * 60 * 1000,
                protection_duration_ms: 30 * 60 * 1000,
                max_attempts_per_target_per_day: 3,
                inter_target_cooldown_ms: 60 * 60 * 1000,
                steal_success_xp: 10,
            },
            levels: LevelCurve {
                steps: vec![
                    LevelStep { level: 1, min_experience: 0, coin_reward: 0, unlock: None },
                    LevelStep {
                        level: 2,
                        min_experience: 100,
                        coin_reward: 50,
                        unlock: Some("plot_4".into()),
                    },
                    LevelStep {
                        level: 3,
                        min_experience: 300,
                        coin_reward: 100,
                        unlock: Some("crop_corn".into()),
                    },
                    LevelStep {
                        level: 4,
                        min_experience: 700,
                        coin_reward: 150,
                        unlock: Some("plot_5".into()),
                    },
                    LevelStep {
                        level: 5,
                        min_experience: 1500,
                        coin_reward: 250,
                        unlock: Some("crop_pumpkin".into()),
                    },
                ],
            },
            crop_base_yield: BTreeMap::from([
                ("wheat".into(), 10),
                ("corn".into(), 8),
                ("pumpkin".into(), 5),
            ]),
            default_base_yield: 6,
            inventory_capacity: 500,
            starting_coins: 100,
            starting_plots: 3,
            lock_ttl_ms: 10_000,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(GameConfig::default().validate().is_ok());
    }

    #[test]
    fn empty_level_curve_rejected() {
        let mut cfg = GameConfig::default();
        cfg.levels.steps.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn non_ascending_curve_rejected() {
        let mut cfg = GameConfig::default();
        cfg.levels.steps[1].min_experience = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_rate_bounds_rejected() {
        let mut cfg = GameConfig::default();
        cfg.steal.min_success_rate = 95.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn inverted_random_band_rejected() {
        let mut cfg = GameConfig::default();
        cfg.steal.random_factor_band = (1.2, 0.8);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_lock_ttl_rejected() {
        let mut cfg = GameConfig::default();
        cfg.lock_ttl_ms = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn level_for_picks_highest_threshold() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.levels.level_for(0), 1);
        assert_eq!(cfg.levels.level_for(99), 1);
        assert_eq!(cfg.levels.level_for(100), 2);
        assert_eq!(cfg.levels.level_for(699), 3);
        assert_eq!(cfg.levels.level_for(10_000), 5);
    }

    #[test]
    fn steps_crossed_returns_every_intermediate_level() {
        let cfg = GameConfig::default();
        let crossed = cfg.levels.steps_crossed(1, 4);
        let levels: Vec<i32> = crossed.iter().map(|s| s.level).collect();
        assert_eq!(levels, vec![2, 3, 4]);
    }

    #[test]
    fn unknown_crop_uses_default_yield() {
        let cfg = GameConfig::default();
        assert_eq!(cfg.base_yield("wheat"), 10);
        assert_eq!(cfg.base_yield("dragonfruit"), cfg.default_base_yield);
    }
}
