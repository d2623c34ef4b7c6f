//! Farm entity domain types.
//!
//! The persisted row shape (column layout, JSONB placement) is a `grange-db`
//! detail; everything above the repository layer works with these types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Plots
// ---------------------------------------------------------------------------

/// Growth state of a single land plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotStatus {
    Empty,
    Growing,
    Mature,
}

/// Quality tier of a plot, scaling its yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityTier {
    Normal,
    Silver,
    Gold,
}

/// One land plot. Plot ids are stable, 1-indexed, and dense.
///
/// This core treats plots as read-only snapshots: planting, watering, and
/// clearing are the land service's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plot {
    pub id: u32,
    /// Crop item id, or `None` when the plot is empty. At most one crop
    /// per plot.
    pub crop: Option<String>,
    pub quality: QualityTier,
    pub status: PlotStatus,
    pub plant_time: Option<Timestamp>,
    pub harvest_time: Option<Timestamp>,
    pub health: i32,
    pub needs_water: bool,
    pub has_pests: bool,
}

impl Plot {
    /// An empty plot with the given id.
    pub fn empty(id: u32) -> Self {
        Self {
            id,
            crop: None,
            quality: QualityTier::Normal,
            status: PlotStatus::Empty,
            plant_time: None,
            harvest_time: None,
            health: 100,
            needs_water: false,
            has_pests: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Lifetime statistics
// ---------------------------------------------------------------------------

/// Lifetime counters. Monotonically increasing; never reset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmStats {
    pub total_earned: i64,
    pub total_spent: i64,
    pub steals_attempted: i64,
    pub steals_succeeded: i64,
    pub times_stolen_from: i64,
    pub items_stolen: i64,
    pub items_lost: i64,
}

// ---------------------------------------------------------------------------
// Farm
// ---------------------------------------------------------------------------

/// A player's persisted farm and economic state.
///
/// Invariants (enforced by [`crate::economy`] and the engine's lock-guarded
/// mutation path, plus a database CHECK on `coins`):
/// - `coins >= 0` always;
/// - inventory quantities never negative;
/// - mutated only while the entity's exclusive lock is held.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Farm {
    pub id: EntityId,
    pub coins: i64,
    pub experience: i64,
    pub level: i32,
    pub plots: Vec<Plot>,
    /// Item id -> quantity.
    pub inventory: BTreeMap<String, i64>,
    pub farm_protection_until: Option<Timestamp>,
    pub item_defense_until: Option<Timestamp>,
    pub item_defense_bonus: i32,
    pub stats: FarmStats,
}

impl Farm {
    /// A fresh farm with configured starting coins and plot count.
    pub fn new(id: impl Into<EntityId>, starting_coins: i64, plot_count: u32) -> Self {
        Self {
            id: id.into(),
            coins: starting_coins,
            experience: 0,
            level: 1,
            plots: (1..=plot_count).map(Plot::empty).collect(),
            inventory: BTreeMap::new(),
            farm_protection_until: None,
            item_defense_until: None,
            item_defense_bonus: 0,
            stats: FarmStats::default(),
        }
    }

    /// Milliseconds of farm protection remaining at `now`, if any.
    pub fn farm_protection_remaining_ms(&self, now: Timestamp) -> Option<i64> {
        remaining_ms(self.farm_protection_until, now)
    }

    /// Milliseconds of item defense remaining at `now`, if any.
    pub fn item_defense_remaining_ms(&self, now: Timestamp) -> Option<i64> {
        remaining_ms(self.item_defense_until, now)
    }

    /// Total units currently held across the inventory.
    pub fn inventory_total(&self) -> i64 {
        self.inventory.values().sum()
    }
}

fn remaining_ms(until: Option<Timestamp>, now: Timestamp) -> Option<i64> {
    let until = until?;
    let remaining = (until - now).num_milliseconds();
    (remaining > 0).then_some(remaining)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    #[test]
    fn new_farm_has_dense_one_indexed_plots() {
        let farm = Farm::new("u1", 100, 4);
        let ids: Vec<u32> = farm.plots.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn protection_remaining_none_when_expired() {
        let now = Utc::now();
        let mut farm = Farm::new("u1", 0, 0);
        farm.farm_protection_until = Some(now - Duration::seconds(1));
        assert_eq!(farm.farm_protection_remaining_ms(now), None);
    }

    #[test]
    fn protection_remaining_positive_when_active() {
        let now = Utc::now();
        let mut farm = Farm::new("u1", 0, 0);
        farm.farm_protection_until = Some(now + Duration::seconds(30));
        let remaining = farm.farm_protection_remaining_ms(now).unwrap();
        assert!(remaining > 0 && remaining <= 30_000);
    }

    #[test]
    fn inventory_total_sums_quantities() {
        let mut farm = Farm::new("u1", 0, 0);
        farm.inventory.insert("wheat".into(), 3);
        farm.inventory.insert("corn".into(), 5);
        assert_eq!(farm.inventory_total(), 8);
    }
}
