//! Database initialization
//!
//! Creates the SQLite database on first run, applies the schema idempotently
//! and seeds the storefront gallery.

use crate::Result;
use chrono::Utc;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Current schema version recorded in `schema_version`
pub const SCHEMA_VERSION: i64 = 1;

/// Settings key recording when the gallery was seeded
pub const GALLERY_SEEDED_KEY: &str = "gallery_seeded_at";

/// Placeholder photos shown until the baker uploads real ones
pub const SEED_GALLERY: &[&str] = &[
    "https://picsum.photos/seed/cake1/600/600",
    "https://picsum.photos/seed/cake2/600/600",
    "https://picsum.photos/seed/cake3/600/600",
    "https://picsum.photos/seed/cake4/600/600",
    "https://picsum.photos/seed/cake5/600/600",
    "https://picsum.photos/seed/cake6/600/600",
];

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    sqlx::query("PRAGMA journal_mode = WAL").execute(&pool).await?;
    sqlx::query("PRAGMA busy_timeout = 5000").execute(&pool).await?;

    create_schema(&pool).await?;

    Ok(pool)
}

/// Open a private in-memory database with the full schema
///
/// Uses a single connection so every query sees the same database.
pub async fn init_memory_database() -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// Create all tables and seed data (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;
    create_settings_table(pool).await?;
    create_orders_table(pool).await?;
    create_gallery_table(pool).await?;
    seed_gallery(pool).await?;
    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(SCHEMA_VERSION)
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn create_settings_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT,
            updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Read a value from the settings table
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<String>> {
    let value: Option<Option<String>> =
        sqlx::query_scalar("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(pool)
            .await?;
    Ok(value.flatten())
}

/// Insert or replace a value in the settings table
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &str) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(key)
    .bind(value)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn create_orders_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id TEXT PRIMARY KEY,
            customer_name TEXT NOT NULL,
            email TEXT,
            phone TEXT NOT NULL,
            fulfillment_type TEXT NOT NULL CHECK (fulfillment_type IN ('Collection', 'Delivery')),
            postcode TEXT,
            address TEXT,
            delivery_fee_pence INTEGER NOT NULL DEFAULT 0 CHECK (delivery_fee_pence >= 0),
            delivery_date TEXT NOT NULL,
            delivery_time_slot TEXT NOT NULL,
            flavor TEXT NOT NULL,
            size TEXT NOT NULL,
            message_on_cake TEXT NOT NULL DEFAULT '',
            inspiration_image TEXT,
            inspiration_link TEXT,
            total_price_pence INTEGER NOT NULL CHECK (total_price_pence >= 0),
            status TEXT NOT NULL DEFAULT 'Pending'
                CHECK (status IN ('Pending', 'Baking', 'Ready', 'Completed', 'Cancelled')),
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_orders_delivery_date ON orders(delivery_date)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_orders_status ON orders(status)")
        .execute(pool)
        .await?;

    Ok(())
}

pub async fn create_gallery_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS gallery_photos (
            id TEXT PRIMARY KEY,
            url TEXT NOT NULL,
            caption TEXT,
            position INTEGER NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Seed placeholder photos into an empty gallery, once
async fn seed_gallery(pool: &SqlitePool) -> Result<()> {
    if get_setting(pool, GALLERY_SEEDED_KEY).await?.is_some() {
        return Ok(());
    }

    let now = Utc::now().to_rfc3339();
    let mut tx = pool.begin().await?;
    for (position, url) in SEED_GALLERY.iter().enumerate() {
        sqlx::query(
            "INSERT INTO gallery_photos (id, url, caption, position, created_at) VALUES (?, ?, NULL, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(*url)
        .bind(position as i64)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
    }
    sqlx::query("INSERT INTO settings (key, value) VALUES (?, ?)")
        .bind(GALLERY_SEEDED_KEY)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    info!("Seeded gallery with {} placeholder photos", SEED_GALLERY.len());
    Ok(())
}
