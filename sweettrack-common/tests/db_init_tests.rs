//! Tests for database creation, schema idempotence and gallery seeding

use sweettrack_common::db::init::{
    get_setting, init_database, init_memory_database, set_setting, GALLERY_SEEDED_KEY,
    SCHEMA_VERSION, SEED_GALLERY,
};
use tempfile::TempDir;

#[tokio::test]
async fn test_database_creation_when_missing() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("nested").join("sweettrack.db");

    let result = init_database(&db_path).await;

    assert!(result.is_ok(), "Database initialization failed: {:?}", result.err());
    assert!(db_path.exists(), "Database file was not created");
}

#[tokio::test]
async fn test_database_opens_existing_without_reseeding() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("sweettrack.db");

    let pool1 = init_database(&db_path).await.unwrap();
    pool1.close().await;

    let pool2 = init_database(&db_path).await.unwrap();
    let photos: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gallery_photos")
        .fetch_one(&pool2)
        .await
        .unwrap();
    assert_eq!(photos, SEED_GALLERY.len() as i64);
}

#[tokio::test]
async fn test_gallery_not_reseeded_after_admin_empties_it() {
    let pool = init_memory_database().await.unwrap();
    sqlx::query("DELETE FROM gallery_photos").execute(&pool).await.unwrap();

    sweettrack_common::db::init::create_schema(&pool).await.unwrap();

    let photos: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM gallery_photos")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(photos, 0);
    assert!(get_setting(&pool, GALLERY_SEEDED_KEY).await.unwrap().is_some());
}

#[tokio::test]
async fn test_schema_version_recorded() {
    let pool = init_memory_database().await.unwrap();
    let version: i64 = sqlx::query_scalar("SELECT MAX(version) FROM schema_version")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(version, SCHEMA_VERSION);
}

#[tokio::test]
async fn test_settings_upsert() {
    let pool = init_memory_database().await.unwrap();
    assert_eq!(get_setting(&pool, "shop_banner").await.unwrap(), None);

    set_setting(&pool, "shop_banner", "Closed on Mondays").await.unwrap();
    set_setting(&pool, "shop_banner", "Open every day").await.unwrap();

    assert_eq!(
        get_setting(&pool, "shop_banner").await.unwrap().as_deref(),
        Some("Open every day")
    );
}

#[tokio::test]
async fn test_orders_table_rejects_unknown_status() {
    let pool = init_memory_database().await.unwrap();
    let result = sqlx::query(
        r#"
        INSERT INTO orders (id, customer_name, phone, fulfillment_type, delivery_date,
            delivery_time_slot, flavor, size, total_price_pence, status, created_at)
        VALUES ('x', 'A', '1', 'Collection', '2026-01-01', 'Morning', 'f', 's', 100, 'Shipped', 'now')
        "#,
    )
    .execute(&pool)
    .await;
    assert!(result.is_err(), "CHECK constraint should reject unknown status");
}
