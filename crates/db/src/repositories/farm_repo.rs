//! Repository for the `farms` table.
//!
//! One entity, one row, one atomic write: `save` upserts the whole record
//! in a single statement, so a request that dies mid-transaction can never
//! leave a half-mutated farm behind.

use grange_core::farm::Farm;
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};

use crate::models::FarmRow;

/// Column list for `farms` queries.
const COLUMNS: &str = "\
    id, coins, experience, level, plots, inventory, \
    farm_protection_until, item_defense_until, item_defense_bonus, \
    stats, created_at, updated_at";

/// Provides load/save operations for farm entities.
pub struct FarmRepo;

impl FarmRepo {
    /// Load a farm by id.
    pub async fn get(pool: &PgPool, id: &str) -> Result<Option<Farm>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM farms WHERE id = $1");
        let row = sqlx::query_as::<_, FarmRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Farm::from))
    }

    /// Load a farm, lazily creating it with the given defaults on first
    /// interaction.
    ///
    /// The insert races benignly: `ON CONFLICT DO NOTHING` followed by a
    /// re-read means concurrent first interactions all observe one row.
    pub async fn get_or_create(
        pool: &PgPool,
        id: &str,
        starting_coins: i64,
        starting_plots: u32,
    ) -> Result<Farm, sqlx::Error> {
        if let Some(farm) = Self::get(pool, id).await? {
            return Ok(farm);
        }

        let fresh = Farm::new(id, starting_coins, starting_plots);
        sqlx::query(
            "INSERT INTO farms (id, coins, experience, level, plots, inventory, stats) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&fresh.id)
        .bind(fresh.coins)
        .bind(fresh.experience)
        .bind(fresh.level)
        .bind(Json(&fresh.plots))
        .bind(Json(&fresh.inventory))
        .bind(Json(&fresh.stats))
        .execute(pool)
        .await?;

        // Re-read so a lost race still returns the winner's row.
        Self::get(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    /// Durably persist the full entity state in one atomic row write.
    ///
    /// Takes any executor so callers that must persist several rows as
    /// one unit can pass an open transaction.
    pub async fn save(executor: impl PgExecutor<'_>, farm: &Farm) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO farms \
                 (id, coins, experience, level, plots, inventory, \
                  farm_protection_until, item_defense_until, item_defense_bonus, stats) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
             ON CONFLICT (id) DO UPDATE SET \
                 coins = EXCLUDED.coins, \
                 experience = EXCLUDED.experience, \
                 level = EXCLUDED.level, \
                 plots = EXCLUDED.plots, \
                 inventory = EXCLUDED.inventory, \
                 farm_protection_until = EXCLUDED.farm_protection_until, \
                 item_defense_until = EXCLUDED.item_defense_until, \
                 item_defense_bonus = EXCLUDED.item_defense_bonus, \
                 stats = EXCLUDED.stats, \
                 updated_at = NOW()",
        )
        .bind(&farm.id)
        .bind(farm.coins)
        .bind(farm.experience)
        .bind(farm.level)
        .bind(Json(&farm.plots))
        .bind(Json(&farm.inventory))
        .bind(farm.farm_protection_until)
        .bind(farm.item_defense_until)
        .bind(farm.item_defense_bonus)
        .bind(Json(&farm.stats))
        .execute(executor)
        .await?;
        Ok(())
    }
}
