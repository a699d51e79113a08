//! Checkout route handlers.
//!
//! Places the backend order from the local cart's current lines. The cart
//! clears only after the backend accepts the order; a rejection (stock
//! change, bad address) leaves the cart intact for the client to fix up.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument};

use vendora_core::{AddressId, OrderId};

use crate::api::types::{OrderInput, OrderItemInput};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::routes::ok;
use crate::state::AppState;

/// Body for POST /checkout.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderBody {
    pub address_id: AddressId,
    pub coupon_code: Option<String>,
}

/// POST /checkout
#[instrument(skip(state, body))]
pub async fn place_order(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(body): Json<PlaceOrderBody>,
) -> Result<Json<Value>> {
    let lines = state.cart().items();
    if lines.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_string()));
    }

    let input = OrderInput {
        items: lines
            .iter()
            .map(|line| OrderItemInput {
                product_id: line.product.id.clone(),
                quantity: line.quantity,
            })
            .collect(),
        address_id: body.address_id,
        coupon_code: body.coupon_code,
    };

    let order = state.account().place_order(&input).await?;

    info!(order = order.id.as_str(), "order placed, clearing cart");
    state.cart().clear();
    state.cart().close_cart();

    Ok(ok(order))
}

/// Body for POST /checkout/coupon.
#[derive(Debug, Deserialize)]
pub struct CouponBody {
    pub code: String,
}

/// POST /checkout/coupon
///
/// Validates against the cart's current derived total.
#[instrument(skip(state))]
pub async fn validate_coupon(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(body): Json<CouponBody>,
) -> Result<Json<Value>> {
    let total = state.cart().total_price();
    let validation = state.account().validate_coupon(&body.code, total).await?;
    Ok(ok(validation))
}

/// Body for POST /checkout/payment-intent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentBody {
    pub order_id: OrderId,
}

/// POST /checkout/payment-intent
#[instrument(skip(state))]
pub async fn payment_intent(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(body): Json<PaymentIntentBody>,
) -> Result<Json<Value>> {
    let order = state.account().order(&body.order_id).await?;
    let intent = state
        .payments()
        .create_intent(&order.id, order.total)
        .await?;
    Ok(ok(intent))
}
