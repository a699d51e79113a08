//! Authentication error types.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] vendora_core::EmailError),

    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Email is already registered.
    #[error("an account with this email already exists")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// No session to operate on.
    #[error("not logged in")]
    NotAuthenticated,

    /// Backend API error.
    #[error("api error: {0}")]
    Api(#[from] ApiError),
}

impl AuthError {
    /// Map a backend error from a credential-bearing call to the matching
    /// auth variant. 401 means bad credentials, 409 means a duplicate
    /// account; anything else passes through.
    pub(super) fn from_credential_api_error(e: ApiError) -> Self {
        match e.status() {
            Some(401) => Self::InvalidCredentials,
            Some(409) => Self::UserAlreadyExists,
            _ => Self::Api(e),
        }
    }
}
