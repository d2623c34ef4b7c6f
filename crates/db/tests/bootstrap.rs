use sqlx::PgPool;

/// Connect, migrate, verify all four namespaces exist.
#[sqlx::test(migrations = "../../migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    grange_db::health_check(&pool).await.unwrap();

    let tables = ["farms", "entity_locks", "action_cooldowns", "steal_attempts"];
    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// The coins CHECK constraint backs the never-negative invariant at the
/// storage layer too.
#[sqlx::test(migrations = "../../migrations")]
async fn test_negative_coins_rejected_by_schema(pool: PgPool) {
    let result = sqlx::query("INSERT INTO farms (id, coins) VALUES ('u1', -1)")
        .execute(&pool)
        .await;
    assert!(result.is_err(), "schema should reject negative coins");
}
