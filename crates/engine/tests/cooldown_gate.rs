//! Integration tests for the per-entity action gate.

use std::time::Duration;

use grange_engine::cooldown::CooldownTracker;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn armed_gate_reports_remaining_then_reopens(pool: PgPool) {
    let tracker = CooldownTracker::new(pool);

    let idle = tracker.is_ready("u1", "steal").await.unwrap();
    assert!(idle.ready);
    assert_eq!(idle.remaining_ms, 0);

    tracker.arm("u1", "steal", 5_000).await.unwrap();
    let armed = tracker.is_ready("u1", "steal").await.unwrap();
    assert!(!armed.ready);
    assert!(armed.remaining_ms > 0 && armed.remaining_ms <= 5_000);

    // Other actions on the same entity stay open.
    assert!(tracker.is_ready("u1", "water").await.unwrap().ready);
}

#[sqlx::test(migrations = "../../migrations")]
async fn gate_reopens_after_the_window_elapses(pool: PgPool) {
    let tracker = CooldownTracker::new(pool);

    tracker.arm("u1", "steal", 100).await.unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let state = tracker.is_ready("u1", "steal").await.unwrap();
    assert!(state.ready);
    assert_eq!(state.remaining_ms, 0);
}
