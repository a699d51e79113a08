//! Authentication route handlers.
//!
//! Handles login, registration, password reset, and email verification.
//! Successful logins associate the Sentry scope with the user; logout
//! clears it.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::api::types::UserPatch;
use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::RequireAuth;
use crate::routes::ok;
use crate::state::AppState;

/// Body for POST /auth/login.
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

/// POST /auth/login
#[instrument(skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginBody>,
) -> Result<Json<Value>> {
    let user = state.auth().login(&body.email, &body.password).await?;
    set_sentry_user(&user.id.as_str(), Some(user.email.as_str()));
    Ok(ok(user))
}

/// Body for POST /auth/register.
#[derive(Debug, Deserialize)]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// POST /auth/register
#[instrument(skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<Json<Value>> {
    let user = state
        .auth()
        .register(&body.name, &body.email, &body.password)
        .await?;
    set_sentry_user(&user.id.as_str(), Some(user.email.as_str()));
    Ok(ok(user))
}

/// POST /auth/logout
pub async fn logout(State(state): State<AppState>) -> Json<Value> {
    state.auth().logout().await;
    clear_sentry_user();
    ok(Value::Null)
}

/// GET /auth/me
pub async fn me(State(state): State<AppState>) -> Result<Json<Value>> {
    let user = state.auth().me().await?;
    Ok(ok(user))
}

/// PUT /auth/profile
#[instrument(skip(state, patch))]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Json(patch): Json<UserPatch>,
) -> Result<Json<Value>> {
    let user = state.auth().update_profile(patch).await?;
    Ok(ok(user))
}

/// Body for POST /auth/forgot-password.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordBody {
    pub email: String,
}

/// POST /auth/forgot-password
#[instrument(skip(state, body))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordBody>,
) -> Result<Json<Value>> {
    state.auth().forgot_password(&body.email).await?;
    Ok(ok(Value::Null))
}

/// Body for POST /auth/reset-password.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordBody {
    pub token: String,
    pub password: String,
}

/// POST /auth/reset-password
#[instrument(skip(state, body))]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(body): Json<ResetPasswordBody>,
) -> Result<Json<Value>> {
    state
        .auth()
        .reset_password(&body.token, &body.password)
        .await?;
    Ok(ok(Value::Null))
}

/// Body for POST /auth/verify-email.
#[derive(Debug, Deserialize)]
pub struct VerifyEmailBody {
    pub token: String,
}

/// POST /auth/verify-email
#[instrument(skip(state, body))]
pub async fn verify_email(
    State(state): State<AppState>,
    Json(body): Json<VerifyEmailBody>,
) -> Result<Json<Value>> {
    state.auth().verify_email(&body.token).await?;
    Ok(ok(Value::Null))
}
