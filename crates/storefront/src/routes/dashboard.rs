//! Dashboard route handlers.
//!
//! Vendor and admin views over the backend's analytics endpoints. The role
//! gate here controls navigation only; the backend enforces the real
//! authorization on its side.

use axum::{Json, extract::State};
use serde_json::Value;
use tracing::instrument;

use crate::error::Result;
use crate::middleware::{RequireRole, VendorOnly};
use crate::routes::ok;
use crate::state::AppState;

/// GET /dashboard/summary
#[instrument(skip(state, _user))]
pub async fn summary(
    State(state): State<AppState>,
    RequireRole(_user, _): RequireRole<VendorOnly>,
) -> Result<Json<Value>> {
    let summary = state.account().sales_summary().await?;
    Ok(ok(summary))
}
