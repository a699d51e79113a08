//! Cart route handlers.
//!
//! Mutations go through the cart store; the handler re-reads the derived
//! view afterwards so the client always receives items, totals, and the
//! drawer flag in one response.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use vendora_core::ProductId;

use crate::error::Result;
use crate::routes::ok;
use crate::state::AppState;
use crate::store::CartLine;

/// Cart state as returned to clients.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total_items: u32,
    pub total_price: Decimal,
    pub is_open: bool,
}

impl CartView {
    fn from_state(state: &AppState) -> Self {
        let cart = state.cart();
        Self {
            items: cart.items(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
            is_open: cart.is_open(),
        }
    }
}

/// GET /cart
pub async fn show(State(state): State<AppState>) -> Json<Value> {
    ok(CartView::from_state(&state))
}

/// Body for POST /cart/add.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddBody {
    pub slug: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// POST /cart/add
///
/// Looks the product up by slug so the cart captures a fresh snapshot of
/// price and stock at the moment of adding.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    Json(body): Json<AddBody>,
) -> Result<Json<Value>> {
    let product = state.catalog().product_by_slug(&body.slug).await?;
    state.cart().add_item(product, body.quantity);
    state.cart().open_cart();
    Ok(ok(CartView::from_state(&state)))
}

/// Body for POST /cart/update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// POST /cart/update
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    Json(body): Json<UpdateBody>,
) -> Json<Value> {
    state.cart().update_quantity(&body.product_id, body.quantity);
    ok(CartView::from_state(&state))
}

/// Body for POST /cart/remove.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveBody {
    pub product_id: ProductId,
}

/// POST /cart/remove
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    Json(body): Json<RemoveBody>,
) -> Json<Value> {
    state.cart().remove_item(&body.product_id);
    ok(CartView::from_state(&state))
}

/// GET /cart/count
///
/// Lightweight badge count for clients that poll without wanting the
/// full cart payload.
pub async fn count(State(state): State<AppState>) -> Json<Value> {
    ok(serde_json::json!({ "count": state.cart().total_items() }))
}

/// POST /cart/clear
pub async fn clear(State(state): State<AppState>) -> Json<Value> {
    state.cart().clear();
    ok(CartView::from_state(&state))
}

/// POST /cart/toggle
pub async fn toggle(State(state): State<AppState>) -> Json<Value> {
    state.cart().toggle_cart();
    ok(CartView::from_state(&state))
}
