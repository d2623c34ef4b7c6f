//! Integration tests for the lock marker table.
//!
//! Exercises the atomic check-and-set against a real database:
//! acquire/busy, reclaim after TTL expiry, and token-guarded release.

use std::time::Duration;

use grange_db::repositories::LockRepo;
use sqlx::PgPool;
use uuid::Uuid;

const TTL_MS: i64 = 10_000;

#[sqlx::test(migrations = "../../migrations")]
async fn acquire_then_busy(pool: PgPool) {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    assert!(LockRepo::try_acquire(&pool, "farm:u1", a, TTL_MS).await.unwrap());
    assert!(!LockRepo::try_acquire(&pool, "farm:u1", b, TTL_MS).await.unwrap());

    // Disjoint names are independent.
    assert!(LockRepo::try_acquire(&pool, "farm:u2", b, TTL_MS).await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn expired_lock_is_reclaimable(pool: PgPool) {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    assert!(LockRepo::try_acquire(&pool, "farm:u1", a, 100).await.unwrap());
    tokio::time::sleep(Duration::from_millis(200)).await;

    // The first holder's TTL has passed; the name is takeable again.
    assert!(LockRepo::try_acquire(&pool, "farm:u1", b, TTL_MS).await.unwrap());
    assert!(!LockRepo::is_held(&pool, "farm:u1", a).await.unwrap());
    assert!(LockRepo::is_held(&pool, "farm:u1", b).await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn release_requires_matching_token(pool: PgPool) {
    let a = Uuid::new_v4();
    let stranger = Uuid::new_v4();

    assert!(LockRepo::try_acquire(&pool, "farm:u1", a, TTL_MS).await.unwrap());

    // A stale/foreign token must not tear down the live lock.
    assert!(!LockRepo::release(&pool, "farm:u1", stranger).await.unwrap());
    assert!(LockRepo::is_held(&pool, "farm:u1", a).await.unwrap());

    assert!(LockRepo::release(&pool, "farm:u1", a).await.unwrap());
    assert!(LockRepo::find(&pool, "farm:u1").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn release_after_expiry_and_reacquire_is_a_noop(pool: PgPool) {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();

    assert!(LockRepo::try_acquire(&pool, "farm:u1", a, 100).await.unwrap());
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(LockRepo::try_acquire(&pool, "farm:u1", b, TTL_MS).await.unwrap());

    // The crashed holder coming back late must not release b's lock.
    assert!(!LockRepo::release(&pool, "farm:u1", a).await.unwrap());
    assert!(LockRepo::is_held(&pool, "farm:u1", b).await.unwrap());
}
