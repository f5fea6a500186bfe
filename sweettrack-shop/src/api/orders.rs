//! Customer order submission
//!
//! The order form validates each step server-side before moving on, then
//! submits the whole draft once the contact step passes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::Serialize;
use sweettrack_common::catalog::PICKUP_ADDRESS;
use sweettrack_common::wizard::{self, OrderDraft, WizardStep};
use sweettrack_common::{time, FulfillmentType, Order};
use tracing::info;

use crate::db::orders::insert_order;
use crate::{ApiError, ApiJson, ApiPath, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct StepValidationResponse {
    pub step: WizardStep,
    pub valid: bool,
    /// Step to show next; the same step on the last page
    pub next_step: WizardStep,
    /// Running delivery fee for the current logistics choice
    pub delivery_fee_pence: i64,
}

/// POST /api/orders/validate/:step
///
/// Validates one step (1-3) of the draft. Field errors come back as 422 with
/// an `error.fields` map.
pub async fn validate_step(
    ApiPath(step): ApiPath<u8>,
    ApiJson(draft): ApiJson<OrderDraft>,
) -> ApiResult<Json<StepValidationResponse>> {
    let step = WizardStep::from_number(step)
        .ok_or_else(|| ApiError::NotFound(format!("Order form step {}", step)))?;

    wizard::validate_step(step, &draft, time::today())?;

    Ok(Json(StepValidationResponse {
        step,
        valid: true,
        next_step: step.next().unwrap_or(step),
        delivery_fee_pence: draft.delivery_fee_pence(),
    }))
}

#[derive(Debug, Serialize)]
pub struct OrderConfirmation {
    pub order: Order,
    /// Where to collect the cake, for collection orders
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_address: Option<&'static str>,
    pub message: String,
}

/// POST /api/orders
///
/// Validates all three steps, prices the order and stores it as `Pending`.
pub async fn submit_order(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<OrderDraft>,
) -> ApiResult<(StatusCode, Json<OrderConfirmation>)> {
    let order = wizard::finalize(&draft, time::today(), time::now())?;
    insert_order(&state.db, &order).await?;

    info!(
        order_id = %order.id,
        fulfillment = %order.fulfillment_type,
        delivery_date = %order.delivery_date,
        total_pence = order.total_price_pence,
        "Order received"
    );

    let pickup_address =
        (order.fulfillment_type == FulfillmentType::Collection).then_some(PICKUP_ADDRESS);
    let message = format!(
        "Thank you, {}. Your order has been received and the baker has been notified.",
        order.customer_name
    );

    Ok((
        StatusCode::CREATED,
        Json(OrderConfirmation {
            order,
            pickup_address,
            message,
        }),
    ))
}

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/api/orders", post(submit_order))
        .route("/api/orders/validate/:step", post(validate_step))
}
