//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a logged-in user (or a role) in route
//! handlers. The session store is the source of truth; the backend revalidates
//! every credential-bearing call, so these guards are gatekeeping, not proof.

use std::marker::PhantomData;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use vendora_core::Role;

use crate::api::types::User;
use crate::state::AppState;

/// Extractor that requires a logged-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Error returned when authentication or a role is required but missing.
pub enum AuthRejection {
    /// No user is logged in.
    Unauthorized,
    /// A user is logged in but lacks the required role.
    Forbidden(&'static str),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "success": false, "message": "Please log in to continue" })),
            )
                .into_response(),
            Self::Forbidden(role) => (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "success": false,
                    "message": format!("This area requires the {role} role"),
                })),
            )
                .into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = state.session();
        if !session.is_authenticated() {
            return Err(AuthRejection::Unauthorized);
        }
        session.user().map(Self).ok_or(AuthRejection::Unauthorized)
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is
/// logged in.
pub struct OptionalAuth(pub Option<User>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = state.session();
        let user = session.is_authenticated().then(|| session.user()).flatten();
        Ok(Self(user))
    }
}

/// Role gate for [`RequireRole`].
pub trait RoleGuard: Send + Sync {
    /// Whether the given role clears this gate.
    fn allows(role: Role) -> bool;

    /// Role name for the rejection message.
    fn name() -> &'static str;
}

/// Gate for vendor areas. Admins pass too.
pub struct VendorOnly;

impl RoleGuard for VendorOnly {
    fn allows(role: Role) -> bool {
        role.is_vendor() || role.is_admin()
    }

    fn name() -> &'static str {
        "vendor"
    }
}

/// Gate for admin areas.
pub struct AdminOnly;

impl RoleGuard for AdminOnly {
    fn allows(role: Role) -> bool {
        role.is_admin()
    }

    fn name() -> &'static str {
        "admin"
    }
}

/// Extractor that requires a logged-in user with a specific role.
///
/// # Example
///
/// ```rust,ignore
/// async fn vendor_dashboard(
///     RequireRole(user, _): RequireRole<VendorOnly>,
/// ) -> impl IntoResponse {
///     // ...
/// }
/// ```
pub struct RequireRole<G: RoleGuard>(pub User, pub PhantomData<G>);

impl<G: RoleGuard> FromRequestParts<AppState> for RequireRole<G> {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if !G::allows(user.role) {
            return Err(AuthRejection::Forbidden(G::name()));
        }

        Ok(Self(user, PhantomData))
    }
}
