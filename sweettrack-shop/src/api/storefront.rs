//! Catalog and delivery quote endpoints

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use sweettrack_common::catalog::{
    self, CakeSize, DeliveryZone, TimeSlot, FLAVORS, INSTAGRAM_URL, PICKUP_ADDRESS, SIZES, ZONES,
};
use sweettrack_common::pricing::{self, Quote};
use sweettrack_common::FulfillmentType;

use crate::{ApiJson, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct TimeSlotInfo {
    pub slot: TimeSlot,
    pub window: &'static str,
}

/// Everything the order form needs to render its choices
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub flavors: &'static [&'static str],
    pub sizes: &'static [CakeSize],
    pub zones: &'static [DeliveryZone],
    pub time_slots: Vec<TimeSlotInfo>,
    pub default_flavor: &'static str,
    pub default_size: &'static str,
    pub pickup_address: &'static str,
    pub instagram_url: &'static str,
}

/// GET /api/catalog
pub async fn get_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        flavors: FLAVORS,
        sizes: SIZES,
        zones: ZONES,
        time_slots: TimeSlot::ALL
            .into_iter()
            .map(|slot| TimeSlotInfo {
                slot,
                window: slot.window(),
            })
            .collect(),
        default_flavor: catalog::default_flavor(),
        default_size: catalog::default_size().label,
        pickup_address: PICKUP_ADDRESS,
        instagram_url: INSTAGRAM_URL,
    })
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub fulfillment_type: FulfillmentType,
    pub postcode: Option<String>,
    pub size: Option<String>,
}

/// POST /api/quote
///
/// **Request:** `{"fulfillment_type": "Delivery", "postcode": "TA21 9RH", "size": "Large (10\")"}`
///
/// Size defaults to the smallest cake. Unknown sizes and missing or invalid
/// delivery postcodes are 400s.
pub async fn post_quote(ApiJson(request): ApiJson<QuoteRequest>) -> ApiResult<Json<Quote>> {
    let size = request
        .size
        .unwrap_or_else(|| catalog::default_size().label.to_string());
    let postcode = request.postcode.as_deref().map(pricing::normalize_postcode);

    let quote = pricing::quote(request.fulfillment_type, postcode.as_deref(), &size)?;
    Ok(Json(quote))
}

pub fn storefront_routes() -> Router<AppState> {
    Router::new()
        .route("/api/catalog", get(get_catalog))
        .route("/api/quote", post(post_quote))
}
