//! Row model for the `farms` table.
//!
//! The row keeps hot scalar fields (coins, experience, level, protection
//! timestamps) as columns and the structured state (plots, inventory,
//! stats) as JSONB. That placement is an internal detail of this crate;
//! everything above the repository sees [`Farm`].

use grange_core::farm::{Farm, FarmStats, Plot};
use grange_core::types::Timestamp;
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::BTreeMap;

/// A row from the `farms` table.
#[derive(Debug, Clone, FromRow)]
pub struct FarmRow {
    pub id: String,
    pub coins: i64,
    pub experience: i64,
    pub level: i32,
    pub plots: Json<Vec<Plot>>,
    pub inventory: Json<BTreeMap<String, i64>>,
    pub farm_protection_until: Option<Timestamp>,
    pub item_defense_until: Option<Timestamp>,
    pub item_defense_bonus: i32,
    pub stats: Json<FarmStats>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<FarmRow> for Farm {
    fn from(row: FarmRow) -> Self {
        Farm {
            id: row.id,
            coins: row.coins,
            experience: row.experience,
            level: row.level,
            plots: row.plots.0,
            inventory: row.inventory.0,
            farm_protection_until: row.farm_protection_until,
            item_defense_until: row.item_defense_until,
            item_defense_bonus: row.item_defense_bonus,
            stats: row.stats.0,
        }
    }
}
