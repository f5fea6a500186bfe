//! Cake-message suggestion endpoint

use axum::{extract::State, routing::post, Json, Router};

use crate::services::suggestions::{suggest_or_fallback, SuggestionRequest, Suggestions};
use crate::{ApiJson, AppState};

/// POST /api/suggestions
///
/// **Request:** `{"occasion": "Wedding", "recipient": "Ana & Luis", "tone": "romantic"}`
/// (every field optional)
///
/// Always answers 200; `fallback` is true when the stock list was used.
pub async fn post_suggestions(
    State(state): State<AppState>,
    body: Option<ApiJson<SuggestionRequest>>,
) -> Json<Suggestions> {
    let request = body.map(|ApiJson(r)| r).unwrap_or_default().with_defaults();
    Json(suggest_or_fallback(state.suggester.as_ref(), &request).await)
}

pub fn suggestion_routes() -> Router<AppState> {
    Router::new().route("/api/suggestions", post(post_suggestions))
}
