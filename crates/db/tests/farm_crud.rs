//! Integration tests for farm load/save round trips.

use grange_core::farm::{PlotStatus, QualityTier};
use grange_db::repositories::{CooldownRepo, FarmRepo};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn get_missing_farm_returns_none(pool: PgPool) {
    assert!(FarmRepo::get(&pool, "nobody").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_or_create_applies_defaults_once(pool: PgPool) {
    let farm = FarmRepo::get_or_create(&pool, "u1", 100, 3).await.unwrap();
    assert_eq!(farm.coins, 100);
    assert_eq!(farm.plots.len(), 3);
    assert_eq!(farm.level, 1);

    // A second call must return the existing row, not re-apply defaults.
    let again = FarmRepo::get_or_create(&pool, "u1", 9999, 12).await.unwrap();
    assert_eq!(again.coins, 100);
    assert_eq!(again.plots.len(), 3);
}

#[sqlx::test(migrations = "../../migrations")]
async fn save_round_trips_structured_state(pool: PgPool) {
    let mut farm = FarmRepo::get_or_create(&pool, "u1", 100, 3).await.unwrap();

    farm.coins = 250;
    farm.experience = 420;
    farm.level = 3;
    farm.plots[0].crop = Some("wheat".into());
    farm.plots[0].status = PlotStatus::Mature;
    farm.plots[0].quality = QualityTier::Gold;
    farm.plots[0].plant_time = Some(chrono::Utc::now() - chrono::Duration::hours(2));
    farm.plots[0].harvest_time = Some(chrono::Utc::now() - chrono::Duration::hours(1));
    farm.inventory.insert("wheat".into(), 12);
    farm.farm_protection_until = Some(chrono::Utc::now() + chrono::Duration::minutes(30));
    farm.stats.steals_attempted = 7;
    FarmRepo::save(&pool, &farm).await.unwrap();

    let loaded = FarmRepo::get(&pool, "u1").await.unwrap().unwrap();
    assert_eq!(loaded.coins, 250);
    assert_eq!(loaded.level, 3);
    assert_eq!(loaded.plots[0].crop.as_deref(), Some("wheat"));
    assert_eq!(loaded.plots[0].status, PlotStatus::Mature);
    assert_eq!(loaded.inventory.get("wheat"), Some(&12));
    assert!(loaded.farm_protection_until.is_some());
    assert_eq!(loaded.stats.steals_attempted, 7);
}

/// Writes spanning two farms and a cooldown inside one transaction must
/// land together or not at all. A transaction dropped without commit
/// leaves neither row changed; one that commits lands every write.
#[sqlx::test(migrations = "../../migrations")]
async fn transactional_saves_commit_or_vanish_together(pool: PgPool) {
    let mut a = FarmRepo::get_or_create(&pool, "a", 100, 3).await.unwrap();
    let mut b = FarmRepo::get_or_create(&pool, "b", 100, 3).await.unwrap();
    a.coins = 500;
    b.stats.times_stolen_from = 1;

    // Rolled back: the scope drops the transaction uncommitted.
    {
        let mut tx = pool.begin().await.unwrap();
        FarmRepo::save(&mut *tx, &a).await.unwrap();
        FarmRepo::save(&mut *tx, &b).await.unwrap();
        CooldownRepo::arm(&mut *tx, "a", "steal", 60_000).await.unwrap();
    }
    assert_eq!(FarmRepo::get(&pool, "a").await.unwrap().unwrap().coins, 100);
    let b_before = FarmRepo::get(&pool, "b").await.unwrap().unwrap();
    assert_eq!(b_before.stats.times_stolen_from, 0);
    assert_eq!(CooldownRepo::remaining_ms(&pool, "a", "steal").await.unwrap(), 0);

    // Committed: all three writes are visible.
    let mut tx = pool.begin().await.unwrap();
    FarmRepo::save(&mut *tx, &a).await.unwrap();
    FarmRepo::save(&mut *tx, &b).await.unwrap();
    CooldownRepo::arm(&mut *tx, "a", "steal", 60_000).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(FarmRepo::get(&pool, "a").await.unwrap().unwrap().coins, 500);
    let b_after = FarmRepo::get(&pool, "b").await.unwrap().unwrap();
    assert_eq!(b_after.stats.times_stolen_from, 1);
    assert!(CooldownRepo::remaining_ms(&pool, "a", "steal").await.unwrap() > 0);
}
