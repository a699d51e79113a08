//! Contact form route handlers.
//!
//! The contact form is handled entirely in this process: submissions are
//! validated, logged for the support workflow, and acknowledged. The main
//! backend is never involved, so the form keeps working through backend
//! outages.

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::routes::ok;

/// Body for POST /contact.
#[derive(Debug, Serialize, Deserialize)]
pub struct ContactBody {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// POST /contact
#[instrument(skip(body), fields(email = %body.email))]
pub async fn submit(Json(body): Json<ContactBody>) -> Result<Json<Value>> {
    validate(&body).map_err(AppError::BadRequest)?;

    tracing::info!(
        name = %body.name.trim(),
        email = %body.email.trim(),
        "contact form submission received"
    );

    Ok(ok(serde_json::json!({ "acknowledged": true })))
}

fn validate(body: &ContactBody) -> std::result::Result<(), String> {
    if body.name.trim().is_empty() {
        return Err("name cannot be empty".to_string());
    }
    if body.message.trim().is_empty() {
        return Err("message cannot be empty".to_string());
    }
    vendora_core::Email::parse(body.email.trim())
        .map_err(|e| format!("invalid email: {e}"))?;
    Ok(())
}
