//! Account route handlers.
//!
//! These routes require authentication; the backend additionally scopes
//! every resource to the bearer token's owner.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use vendora_core::{AddressId, NotificationId, OrderId, ProductId};

use crate::api::types::{AddressInput, ReturnInput};
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::routes::ok;
use crate::state::AppState;

/// Query parameters for paginated listings.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

// =============================================================================
// Orders
// =============================================================================

/// GET /account/orders
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(query): Query<PageQuery>,
) -> Result<Json<Value>> {
    let page = state.account().orders(query.page).await?;
    Ok(ok(page))
}

/// GET /account/orders/{id}
#[instrument(skip(state))]
pub async fn order(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Value>> {
    let order = state.account().order(&id).await?;
    Ok(ok(order))
}

/// POST /account/orders/{id}/cancel
#[instrument(skip(state))]
pub async fn cancel_order(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<OrderId>,
) -> Result<Json<Value>> {
    let order = state.account().cancel_order(&id).await?;
    Ok(ok(order))
}

// =============================================================================
// Returns
// =============================================================================

/// GET /account/returns
pub async fn returns(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Value>> {
    let returns = state.account().returns().await?;
    Ok(ok(returns))
}

/// POST /account/returns
#[instrument(skip(state, input))]
pub async fn request_return(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<ReturnInput>,
) -> Result<Json<Value>> {
    let request = state.account().request_return(&input).await?;
    Ok(ok(request))
}

// =============================================================================
// Addresses
// =============================================================================

/// GET /account/addresses
pub async fn addresses(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Value>> {
    let addresses = state.account().addresses().await?;
    Ok(ok(addresses))
}

/// POST /account/addresses
#[instrument(skip(state, input))]
pub async fn create_address(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(input): Json<AddressInput>,
) -> Result<Json<Value>> {
    let address = state.account().create_address(&input).await?;
    Ok(ok(address))
}

/// PUT /account/addresses/{id}
#[instrument(skip(state, input))]
pub async fn update_address(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<AddressId>,
    Json(input): Json<AddressInput>,
) -> Result<Json<Value>> {
    let address = state.account().update_address(&id, &input).await?;
    Ok(ok(address))
}

/// DELETE /account/addresses/{id}
#[instrument(skip(state))]
pub async fn delete_address(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<AddressId>,
) -> Result<Json<Value>> {
    state.account().delete_address(&id).await?;
    Ok(ok(Value::Null))
}

// =============================================================================
// Wishlist
// =============================================================================

/// GET /account/wishlist
pub async fn wishlist(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Value>> {
    let items = state.account().wishlist().await?;
    Ok(ok(items))
}

/// Body for POST /account/wishlist.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistBody {
    pub product_id: ProductId,
}

/// POST /account/wishlist
#[instrument(skip(state))]
pub async fn add_to_wishlist(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(body): Json<WishlistBody>,
) -> Result<Json<Value>> {
    state.account().add_to_wishlist(&body.product_id).await?;
    Ok(ok(Value::Null))
}

/// DELETE /account/wishlist/{id}
#[instrument(skip(state))]
pub async fn remove_from_wishlist(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<ProductId>,
) -> Result<Json<Value>> {
    state.account().remove_from_wishlist(&id).await?;
    Ok(ok(Value::Null))
}

// =============================================================================
// Notifications
// =============================================================================

/// GET /account/notifications
pub async fn notifications(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Value>> {
    let notifications = state.account().notifications().await?;
    Ok(ok(notifications))
}

/// POST /account/notifications/{id}/read
#[instrument(skip(state))]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<NotificationId>,
) -> Result<Json<Value>> {
    state.account().mark_notification_read(&id).await?;
    Ok(ok(Value::Null))
}
