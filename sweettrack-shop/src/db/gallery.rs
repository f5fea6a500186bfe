//! Gallery photo persistence
//!
//! Positions are kept dense (0..n) so that moving a photo is a simple
//! remove-and-insert over the ordered list.

use chrono::Utc;
use sqlx::{FromRow, SqlitePool};
use sweettrack_common::models::GalleryPhoto;
use sweettrack_common::{time::parse_timestamp, Error, Result};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct PhotoRow {
    id: String,
    url: String,
    caption: Option<String>,
    position: i64,
    created_at: String,
}

impl TryFrom<PhotoRow> for GalleryPhoto {
    type Error = Error;

    fn try_from(row: PhotoRow) -> Result<Self> {
        Ok(GalleryPhoto {
            id: Uuid::parse_str(&row.id)
                .map_err(|_| Error::Internal(format!("Corrupt gallery photo id: {}", row.id)))?,
            created_at: parse_timestamp(&row.created_at)?,
            url: row.url,
            caption: row.caption,
            position: row.position,
        })
    }
}

pub async fn list_photos(pool: &SqlitePool) -> Result<Vec<GalleryPhoto>> {
    let rows: Vec<PhotoRow> = sqlx::query_as(
        "SELECT id, url, caption, position, created_at FROM gallery_photos ORDER BY position ASC, created_at ASC",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(GalleryPhoto::try_from).collect()
}

/// Append a photo at the end of the gallery
///
/// Reading the last position and inserting share one transaction.
pub async fn add_photo(pool: &SqlitePool, url: &str, caption: Option<&str>) -> Result<GalleryPhoto> {
    let mut tx = pool.begin().await?;

    let max: Option<i64> = sqlx::query_scalar("SELECT MAX(position) FROM gallery_photos")
        .fetch_one(&mut *tx)
        .await?;

    let photo = GalleryPhoto {
        id: Uuid::new_v4(),
        url: url.to_string(),
        caption: caption.map(str::to_string),
        position: max.map_or(0, |m| m + 1),
        created_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO gallery_photos (id, url, caption, position, created_at) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(photo.id.to_string())
    .bind(&photo.url)
    .bind(&photo.caption)
    .bind(photo.position)
    .bind(photo.created_at.to_rfc3339())
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(photo)
}

pub async fn delete_photo(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM gallery_photos WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(Error::NotFound(format!("Gallery photo {}", id)));
    }

    renumber(pool).await
}

/// Move a photo to a new zero-based position, clamped to the gallery size
pub async fn move_photo(pool: &SqlitePool, id: Uuid, position: i64) -> Result<Vec<GalleryPhoto>> {
    let mut ids: Vec<String> =
        sqlx::query_scalar("SELECT id FROM gallery_photos ORDER BY position ASC, created_at ASC")
            .fetch_all(pool)
            .await?;

    let key = id.to_string();
    let current = ids
        .iter()
        .position(|existing| *existing == key)
        .ok_or_else(|| Error::NotFound(format!("Gallery photo {}", id)))?;

    let moved = ids.remove(current);
    let target = position.clamp(0, ids.len() as i64) as usize;
    ids.insert(target, moved);

    write_positions(pool, &ids).await?;
    list_photos(pool).await
}

async fn renumber(pool: &SqlitePool) -> Result<()> {
    let ids: Vec<String> =
        sqlx::query_scalar("SELECT id FROM gallery_photos ORDER BY position ASC, created_at ASC")
            .fetch_all(pool)
            .await?;
    write_positions(pool, &ids).await
}

async fn write_positions(pool: &SqlitePool, ids: &[String]) -> Result<()> {
    let mut tx = pool.begin().await?;
    for (position, id) in ids.iter().enumerate() {
        sqlx::query("UPDATE gallery_photos SET position = ? WHERE id = ?")
            .bind(position as i64)
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(())
}
