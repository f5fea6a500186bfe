//! sweettrack-shop library - bakery storefront and back-office service
//!
//! Customers browse the gallery, get delivery quotes and submit cake orders
//! through the three-step order wizard. The administrator logs in with the
//! shared passphrase to manage orders, the gallery and revenue insights.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, Method};
use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod services;
pub mod sessions;

pub use crate::error::{ApiError, ApiResult};
pub use crate::extract::{ApiJson, ApiPath};

use services::suggestions::MessageSuggester;
use sessions::SessionStore;

/// Request bodies may carry an inline inspiration image
const MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Active admin sessions
    pub sessions: SessionStore,
    /// SHA-256 digest of the admin passphrase
    pub admin_digest: [u8; 32],
    /// Cake-message suggestion backend
    pub suggester: Arc<dyn MessageSuggester>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        admin_passphrase: &str,
        session_ttl: Duration,
        suggester: Arc<dyn MessageSuggester>,
    ) -> Self {
        Self {
            db,
            sessions: SessionStore::new(session_ttl),
            admin_digest: sweettrack_common::auth::passphrase_digest(admin_passphrase),
            suggester,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Storefront routes are public; everything under `/api/admin` except login
/// requires a bearer session token.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;

    let admin = api::admin_routes().layer(middleware::from_fn_with_state(
        state.clone(),
        api::auth_middleware,
    ));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .merge(admin)
        .merge(api::ui_routes())
        .merge(api::health_routes())
        .merge(api::storefront_routes())
        .merge(api::order_routes())
        .merge(api::gallery_routes())
        .merge(api::suggestion_routes())
        .merge(api::login_routes())
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
