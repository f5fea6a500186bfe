//! Admin login and session middleware
//!
//! The admin logs in with the shared passphrase and then sends
//! `Authorization: Bearer <token>` on every `/api/admin` request.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sweettrack_common::auth::{parse_bearer, verify_passphrase};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{ApiError, ApiJson, ApiResult, AppState};

/// Token of the authenticated admin session, set by [`auth_middleware`]
#[derive(Debug, Clone, Copy)]
pub struct AdminSession(pub Uuid);

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub passphrase: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub expires_in_seconds: u64,
}

/// POST /api/admin/login
///
/// **Request:** `{"passphrase": "..."}`
/// **Response:** `{"token": "<uuid>", "expires_in_seconds": 43200}`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    if !verify_passphrase(&request.passphrase, &state.admin_digest) {
        warn!("Admin login rejected: wrong passphrase");
        return Err(ApiError::Unauthorized("Wrong passphrase".to_string()));
    }

    let token = state.sessions.create().await;
    info!("Admin logged in");

    Ok(Json(LoginResponse {
        token,
        expires_in_seconds: state.sessions.ttl().as_secs(),
    }))
}

/// Authentication middleware for admin routes
///
/// Rejects requests without a live session token with 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer)
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let token = Uuid::parse_str(token)
        .map_err(|_| ApiError::Unauthorized("Malformed session token".to_string()))?;

    if !state.sessions.validate(&token).await {
        return Err(ApiError::Unauthorized("Session expired or unknown".to_string()));
    }

    request.extensions_mut().insert(AdminSession(token));
    Ok(next.run(request).await)
}

pub fn login_routes() -> Router<AppState> {
    Router::new().route("/api/admin/login", post(login))
}
