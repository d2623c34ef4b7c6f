//! Pure arithmetic behind the steal protocol.
//!
//! Kept free of I/O and randomness so every formula is unit-testable with
//! fixed inputs; the engine injects the actual draws.

use crate::config::StealConfig;
use crate::farm::{Plot, PlotStatus};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Success rate
// ---------------------------------------------------------------------------

/// Success rate in percentage points for an attempt by `actor_level`
/// against `target_level`.
///
/// `rate = clamp(base + (actor - target) * level_factor * 10, min, max)`.
/// The x10 scaling is deliberate: each level of difference shifts the rate
/// by `level_factor * 10` points.
pub fn success_rate(actor_level: i32, target_level: i32, cfg: &StealConfig) -> f64 {
    let diff = (actor_level - target_level) as f64;
    (cfg.base_success_rate + diff * cfg.level_factor * 10.0)
        .clamp(cfg.min_success_rate, cfg.max_success_rate)
}

// ---------------------------------------------------------------------------
// Growth
// ---------------------------------------------------------------------------

/// Growth fraction of a plot at `now`, computed from its timestamps.
///
/// Returns `None` when the timestamps are missing or inverted (a plot with
/// `harvest_time <= plant_time` is corrupt data, never eligible). The cached
/// `status` flag is deliberately not consulted: a stale `Mature` flag on a
/// partially-grown plot must not make it stealable.
pub fn growth_fraction(plot: &Plot, now: Timestamp) -> Option<f64> {
    let plant = plot.plant_time?;
    let harvest = plot.harvest_time?;
    let total = (harvest - plant).num_milliseconds();
    if total <= 0 {
        return None;
    }
    let elapsed = (now - plant).num_milliseconds();
    Some(elapsed as f64 / total as f64)
}

/// Whether a plot is eligible for theft at `now`.
///
/// A plot is stealable iff it is not empty, holds a crop, has valid
/// plant/harvest timestamps, and its computed growth fraction is `>= 1.0`.
pub fn is_stealable(plot: &Plot, now: Timestamp) -> bool {
    if plot.status == PlotStatus::Empty || plot.crop.is_none() {
        return false;
    }
    matches!(growth_fraction(plot, now), Some(g) if g >= 1.0)
}

// ---------------------------------------------------------------------------
// Loot
// ---------------------------------------------------------------------------

/// Loot quantity taken from one stealable plot.
///
/// `floor(max(1, base_yield * min(reward_rate, reward_max_rate) * quality
/// * min(growth_cap, growth) * random_factor))`, with at least one unit per
/// plot before capacity limits apply.
pub fn loot_quantity(
    base_yield: i64,
    quality_multiplier: f64,
    growth: f64,
    random_factor: f64,
    cfg: &StealConfig,
) -> i64 {
    let rate = cfg.reward_rate.min(cfg.reward_max_rate);
    let raw = base_yield as f64 * rate * quality_multiplier * growth.min(cfg.growth_cap)
        * random_factor;
    raw.max(1.0).floor() as i64
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::config::GameConfig;
    use crate::farm::QualityTier;

    use super::*;

    fn steal_cfg() -> StealConfig {
        GameConfig::default().steal
    }

    // -- success_rate ---------------------------------------------------------

    #[test]
    fn equal_levels_yield_base_rate() {
        let cfg = steal_cfg();
        assert_eq!(success_rate(5, 5, &cfg), cfg.base_success_rate);
    }

    #[test]
    fn each_level_of_advantage_adds_factor_times_ten() {
        let cfg = steal_cfg();
        let rate = success_rate(7, 5, &cfg);
        assert_eq!(rate, cfg.base_success_rate + 2.0 * cfg.level_factor * 10.0);
    }

    #[test]
    fn large_disadvantage_clamps_to_min() {
        let cfg = steal_cfg();
        assert_eq!(success_rate(1, 50, &cfg), cfg.min_success_rate);
    }

    #[test]
    fn large_advantage_clamps_to_max() {
        let cfg = steal_cfg();
        assert_eq!(success_rate(50, 1, &cfg), cfg.max_success_rate);
    }

    // -- growth_fraction / is_stealable ---------------------------------------

    fn planted_plot(planted_secs_ago: i64, grow_secs: i64) -> Plot {
        let now = Utc::now();
        let mut plot = Plot::empty(1);
        plot.crop = Some("wheat".into());
        plot.status = PlotStatus::Growing;
        plot.plant_time = Some(now - Duration::seconds(planted_secs_ago));
        plot.harvest_time = Some(now - Duration::seconds(planted_secs_ago) + Duration::seconds(grow_secs));
        plot
    }

    #[test]
    fn fully_grown_plot_is_stealable() {
        let plot = planted_plot(120, 60);
        assert!(is_stealable(&plot, Utc::now()));
    }

    #[test]
    fn half_grown_plot_is_not_stealable() {
        let plot = planted_plot(30, 60);
        let g = growth_fraction(&plot, Utc::now()).unwrap();
        assert!(g < 1.0);
        assert!(!is_stealable(&plot, Utc::now()));
    }

    #[test]
    fn stale_mature_flag_does_not_make_plot_stealable() {
        // The cached status lies; the timestamps say it is half grown.
        let mut plot = planted_plot(30, 60);
        plot.status = PlotStatus::Mature;
        assert!(!is_stealable(&plot, Utc::now()));
    }

    #[test]
    fn empty_plot_is_not_stealable() {
        assert!(!is_stealable(&Plot::empty(1), Utc::now()));
    }

    #[test]
    fn inverted_timestamps_are_never_eligible() {
        let mut plot = planted_plot(120, 60);
        std::mem::swap(&mut plot.plant_time, &mut plot.harvest_time);
        assert_eq!(growth_fraction(&plot, Utc::now()), None);
        assert!(!is_stealable(&plot, Utc::now()));
    }

    #[test]
    fn missing_timestamps_are_never_eligible() {
        let mut plot = planted_plot(120, 60);
        plot.plant_time = None;
        assert!(!is_stealable(&plot, Utc::now()));
    }

    // -- loot_quantity --------------------------------------------------------

    #[test]
    fn loot_matches_reward_rate_fixture() {
        let cfg = steal_cfg();
        // base_yield=10, quality 1, growth 1.0, random factor fixed at 1.0.
        let qty = loot_quantity(10, 1.0, 1.0, 1.0, &cfg);
        let expected = (10.0 * cfg.reward_rate.min(cfg.reward_max_rate)).floor() as i64;
        assert_eq!(qty, expected);
    }

    #[test]
    fn loot_is_at_least_one_unit() {
        let cfg = steal_cfg();
        assert_eq!(loot_quantity(1, 1.0, 1.0, 0.8, &cfg), 1);
    }

    #[test]
    fn overgrowth_is_capped() {
        let cfg = steal_cfg();
        let capped = loot_quantity(100, 1.0, cfg.growth_cap, 1.0, &cfg);
        let overgrown = loot_quantity(100, 1.0, 40.0, 1.0, &cfg);
        assert_eq!(capped, overgrown);
    }

    #[test]
    fn quality_scales_loot() {
        let cfg = steal_cfg();
        let game = GameConfig::default();
        let normal = loot_quantity(100, game.quality_multiplier(QualityTier::Normal), 1.0, 1.0, &cfg);
        let gold = loot_quantity(100, game.quality_multiplier(QualityTier::Gold), 1.0, 1.0, &cfg);
        assert!(gold > normal);
    }
}
