//! Storefront gallery endpoints
//!
//! Listing is public; changes go through the admin router.

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use sweettrack_common::models::GalleryPhoto;
use tracing::info;
use uuid::Uuid;

use crate::db::gallery;
use crate::{ApiError, ApiJson, ApiPath, ApiResult, AppState};

/// GET /api/gallery
pub async fn list_gallery(State(state): State<AppState>) -> ApiResult<Json<Vec<GalleryPhoto>>> {
    Ok(Json(gallery::list_photos(&state.db).await?))
}

#[derive(Debug, Deserialize)]
pub struct AddPhotoRequest {
    pub url: String,
    pub caption: Option<String>,
}

fn is_acceptable_photo_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("data:image/") {
        return true;
    }
    reqwest::Url::parse(url)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some())
        .unwrap_or(false)
}

/// POST /api/admin/gallery
///
/// Appends a photo. The URL must be `http(s)` or an inline `data:image/` URL.
pub async fn add_photo(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AddPhotoRequest>,
) -> ApiResult<(StatusCode, Json<GalleryPhoto>)> {
    let url = request.url.trim();
    if !is_acceptable_photo_url(url) {
        return Err(ApiError::BadRequest(
            "Photo URL must be an http(s) URL or an image data URL".to_string(),
        ));
    }
    let caption = request
        .caption
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());

    let photo = gallery::add_photo(&state.db, url, caption).await?;
    info!(photo_id = %photo.id, position = photo.position, "Gallery photo added");

    Ok((StatusCode::CREATED, Json(photo)))
}

/// DELETE /api/admin/gallery/:id
pub async fn delete_photo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    gallery::delete_photo(&state.db, id).await?;
    info!(photo_id = %id, "Gallery photo removed");
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct MovePhotoRequest {
    /// Zero-based target position
    pub position: i64,
}

/// PUT /api/admin/gallery/:id/position
///
/// Returns the reordered gallery.
pub async fn move_photo(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<MovePhotoRequest>,
) -> ApiResult<Json<Vec<GalleryPhoto>>> {
    let photos = gallery::move_photo(&state.db, id, request.position).await?;
    Ok(Json(photos))
}

pub fn gallery_routes() -> Router<AppState> {
    Router::new().route("/api/gallery", get(list_gallery))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acceptable_photo_urls() {
        assert!(is_acceptable_photo_url("https://picsum.photos/seed/cake1/600/600"));
        assert!(is_acceptable_photo_url("data:image/jpeg;base64,/9j/4AAQ"));
        assert!(!is_acceptable_photo_url("ftp://example.com/cake.jpg"));
        assert!(!is_acceptable_photo_url("javascript:alert(1)"));
        assert!(!is_acceptable_photo_url("cake.jpg"));
    }
}
