//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    rentora_db::run_migrations(&db).await.unwrap();

    // Verify that all tables exist by querying INFO FOR DB.
    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(info_str.contains("user"), "missing user table");
    assert!(info_str.contains("listing"), "missing listing table");
    assert!(info_str.contains("booking"), "missing booking table");
    assert!(info_str.contains("review"), "missing review table");
    assert!(
        info_str.contains("search_history"),
        "missing search_history table"
    );
    assert!(
        info_str.contains("listing_view"),
        "missing listing_view table"
    );
    assert!(
        info_str.contains("revoked_token"),
        "missing revoked_token table"
    );

    // Verify migration was recorded.
    assert!(info_str.contains("_migration"), "missing _migration table");
}

#[tokio::test]
async fn migration_is_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    // Run twice — should not fail.
    rentora_db::run_migrations(&db).await.unwrap();
    rentora_db::run_migrations(&db).await.unwrap();

    // Verify only one migration record exists.
    let mut result = db.query("SELECT * FROM _migration").await.unwrap();
    let records: Vec<surrealdb_types::Value> = result.take(0).unwrap();
    assert_eq!(records.len(), 1, "expected exactly one migration record");
}

#[tokio::test]
async fn schema_rejects_unknown_enum_values() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rentora_db::run_migrations(&db).await.unwrap();

    // The role ASSERT must reject values outside the enum.
    let result = db
        .query(
            "CREATE user SET username = 'x', first_name = 'x', \
             last_name = 'x', email = 'x@example.com', \
             password_hash = 'h', role = 'superuser', is_active = true",
        )
        .await
        .unwrap();
    assert!(result.check().is_err(), "invalid role should be rejected");

    // Ratings outside 1..=5 must be rejected.
    let result = db
        .query(
            "CREATE review SET listing_id = 'l', tenant_id = 't', \
             rating = 9",
        )
        .await
        .unwrap();
    assert!(result.check().is_err(), "invalid rating should be rejected");
}
