//! Admin back-office endpoints
//!
//! Every route here sits behind [`super::auth_middleware`].

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use sweettrack_common::catalog::format_pence;
use sweettrack_common::insights::{self, Insights};
use sweettrack_common::{FulfillmentType, Order, OrderStatus};
use tracing::info;
use uuid::Uuid;

use super::auth::AdminSession;
use super::gallery;
use crate::db::orders;
use crate::{ApiError, ApiJson, ApiPath, ApiResult, AppState};

const MAPS_SEARCH_URL: &str = "https://www.google.com/maps/search/";

/// Order as shown in the admin tracker
#[derive(Debug, Serialize)]
pub struct AdminOrderView {
    #[serde(flatten)]
    pub order: Order,
    pub total_price: String,
    /// Map search for the delivery address, delivery orders only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maps_url: Option<String>,
}

impl From<Order> for AdminOrderView {
    fn from(order: Order) -> Self {
        let maps_url = maps_url(&order);
        Self {
            total_price: format_pence(order.total_price_pence),
            maps_url,
            order,
        }
    }
}

/// Google Maps search link for a delivery order's address
pub fn maps_url(order: &Order) -> Option<String> {
    if order.fulfillment_type != FulfillmentType::Delivery {
        return None;
    }
    let query = format!(
        "{} {}",
        order.address.as_deref().unwrap_or_default(),
        order.postcode.as_deref().unwrap_or_default()
    );
    reqwest::Url::parse_with_params(MAPS_SEARCH_URL, &[("api", "1"), ("query", query.trim())])
        .ok()
        .map(String::from)
}

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub count: usize,
    pub orders: Vec<AdminOrderView>,
}

/// GET /api/admin/orders[?status=Pending]
///
/// Soonest delivery first.
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> ApiResult<Json<OrderListResponse>> {
    let status = query
        .status
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::parse::<OrderStatus>)
        .transpose()?;

    let orders: Vec<AdminOrderView> = orders::list_orders(&state.db, status)
        .await?
        .into_iter()
        .map(AdminOrderView::from)
        .collect();

    Ok(Json(OrderListResponse {
        count: orders.len(),
        orders,
    }))
}

/// GET /api/admin/orders/:id
pub async fn get_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<AdminOrderView>> {
    let order = orders::get_order(&state.db, id).await?;
    Ok(Json(order.into()))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
}

/// PUT /api/admin/orders/:id/status
///
/// **Request:** `{"status": "Baking"}`
///
/// Any status may be set from any other; the tracker is a manual board.
pub async fn update_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(request): ApiJson<StatusUpdateRequest>,
) -> ApiResult<Json<AdminOrderView>> {
    let order = orders::update_order_status(&state.db, id, request.status).await?;
    info!(order_id = %id, status = %order.status, "Order status updated");
    Ok(Json(order.into()))
}

/// DELETE /api/admin/orders/:id
pub async fn delete_order(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<StatusCode> {
    orders::delete_order(&state.db, id).await?;
    info!(order_id = %id, "Order deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/admin/insights
pub async fn get_insights(State(state): State<AppState>) -> ApiResult<Json<Insights>> {
    let orders = orders::list_orders(&state.db, None).await?;
    Ok(Json(insights::summarize(&orders)))
}

/// POST /api/admin/logout
pub async fn logout(
    State(state): State<AppState>,
    Extension(AdminSession(token)): Extension<AdminSession>,
) -> ApiResult<StatusCode> {
    if !state.sessions.revoke(&token).await {
        return Err(ApiError::Unauthorized("Session already ended".to_string()));
    }
    info!("Admin logged out");
    Ok(StatusCode::NO_CONTENT)
}

/// Routes requiring an admin session
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/logout", post(logout))
        .route("/api/admin/orders", get(list_orders))
        .route("/api/admin/orders/:id", get(get_order).delete(delete_order))
        .route("/api/admin/orders/:id/status", put(update_status))
        .route("/api/admin/insights", get(get_insights))
        .route("/api/admin/gallery", post(gallery::add_photo))
        .route("/api/admin/gallery/:id", delete(gallery::delete_photo))
        .route("/api/admin/gallery/:id/position", put(gallery::move_photo))
}
