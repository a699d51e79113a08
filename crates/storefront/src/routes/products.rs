//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::error::Result;
use crate::routes::ok;
use crate::services::catalog::ProductFilter;
use crate::state::AppState;

/// Query parameters for the product listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub shop: Option<String>,
    pub sort: Option<String>,
    pub q: Option<String>,
}

impl From<ListQuery> for ProductFilter {
    fn from(q: ListQuery) -> Self {
        Self {
            page: q.page,
            per_page: q.per_page,
            category: q.category,
            brand: q.brand,
            shop: q.shop,
            sort: q.sort,
            search: q.q,
        }
    }
}

/// GET /products
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>> {
    let page = state.catalog().products(&query.into()).await?;
    Ok(ok(page))
}

/// GET /products/{slug}
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>> {
    let product = state.catalog().product_by_slug(&slug).await?;
    Ok(ok(product))
}

/// GET /categories
pub async fn categories(State(state): State<AppState>) -> Result<Json<Value>> {
    let categories = state.catalog().categories().await?;
    Ok(ok(categories))
}

/// GET /brands
pub async fn brands(State(state): State<AppState>) -> Result<Json<Value>> {
    let brands = state.catalog().brands().await?;
    Ok(ok(brands))
}

/// Query parameters for the shop listing.
#[derive(Debug, Deserialize)]
pub struct ShopsQuery {
    pub page: Option<u32>,
}

/// GET /shops
pub async fn shops(
    State(state): State<AppState>,
    Query(query): Query<ShopsQuery>,
) -> Result<Json<Value>> {
    let page = state.catalog().shops(query.page).await?;
    Ok(ok(page))
}

/// GET /shops/{slug}
#[instrument(skip(state))]
pub async fn shop(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Value>> {
    let shop = state.catalog().shop_by_slug(&slug).await?;
    Ok(ok(shop))
}
