//! Authentication service.
//!
//! Credential flows against the backend auth endpoints, plus session
//! bootstrap: re-establishing "who is logged in" from persisted tokens when
//! the process starts.

mod error;

pub use error::AuthError;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::json;
use tracing::{debug, instrument, warn};

use vendora_core::Email;

use crate::api::ApiClient;
use crate::api::types::{AuthPayload, User, UserPatch};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Authentication service.
///
/// Stateless apart from the one-shot bootstrap marker; user state lives in
/// the session store the API client carries.
#[derive(Clone)]
pub struct AuthService {
    inner: Arc<AuthServiceInner>,
}

struct AuthServiceInner {
    api: ApiClient,
    bootstrapped: AtomicBool,
}

impl AuthService {
    /// Create a new authentication service over the shared API client.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            inner: Arc::new(AuthServiceInner {
                api,
                bootstrapped: AtomicBool::new(false),
            }),
        }
    }

    // =========================================================================
    // Credential flows
    // =========================================================================

    /// Login with email and password.
    ///
    /// On success the session store receives the user record and token pair.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::InvalidCredentials` if the backend rejects the pair.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let payload: AuthPayload = self
            .inner
            .api
            .post(
                "/auth/login",
                &json!({ "email": email.as_str(), "password": password }),
            )
            .await
            .map_err(AuthError::from_credential_api_error)?;

        self.establish_session(payload)
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let payload: AuthPayload = self
            .inner
            .api
            .post(
                "/auth/register",
                &json!({
                    "name": name,
                    "email": email.as_str(),
                    "password": password,
                }),
            )
            .await
            .map_err(AuthError::from_credential_api_error)?;

        self.establish_session(payload)
    }

    /// Log out: revoke the refresh token at the backend (best effort) and
    /// wipe the local session, tokens included.
    pub async fn logout(&self) {
        if let Some(refresh_token) = self.inner.api.session().refresh_token()
            && let Err(e) = self
                .inner
                .api
                .post::<serde_json::Value>("/auth/logout", &json!({ "refreshToken": refresh_token }))
                .await
        {
            // Local logout proceeds regardless; the token expires on its own.
            warn!(error = %e, "backend logout failed");
        }

        let session = self.inner.api.session();
        session.logout();
        session.clear_tokens();
    }

    /// Fetch the current user from the backend and refresh the stored record.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the backend no longer
    /// accepts the stored credentials.
    pub async fn me(&self) -> Result<User, AuthError> {
        let user: User = self
            .inner
            .api
            .get("/auth/me")
            .await
            .map_err(AuthError::from_credential_api_error)?;

        self.inner.api.session().login(user.clone());
        Ok(user)
    }

    /// Update the current user's profile, locally and at the backend.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` if no user is logged in.
    pub async fn update_profile(&self, patch: UserPatch) -> Result<User, AuthError> {
        if !self.inner.api.session().is_authenticated() {
            return Err(AuthError::NotAuthenticated);
        }

        let user: User = self.inner.api.put("/auth/profile", &patch).await?;
        self.inner.api.session().update_user(&patch);
        Ok(user)
    }

    // =========================================================================
    // Password recovery & email verification
    // =========================================================================

    /// Request a password reset email.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        let email = Email::parse(email)?;
        self.inner
            .api
            .post::<serde_json::Value>(
                "/auth/forgot-password",
                &json!({ "email": email.as_str() }),
            )
            .await?;
        Ok(())
    }

    /// Complete a password reset with an emailed token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::WeakPassword` if the new password doesn't meet
    /// requirements, or the backend error for an invalid token.
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AuthError> {
        validate_password(new_password)?;
        self.inner
            .api
            .post::<serde_json::Value>(
                "/auth/reset-password",
                &json!({ "token": token, "password": new_password }),
            )
            .await?;
        Ok(())
    }

    /// Confirm an email address with an emailed token.
    ///
    /// # Errors
    ///
    /// Returns the backend error for an invalid or expired token.
    pub async fn verify_email(&self, token: &str) -> Result<(), AuthError> {
        self.inner
            .api
            .post::<serde_json::Value>("/auth/verify-email", &json!({ "token": token }))
            .await?;

        // Reflect the verified flag locally without waiting for a refetch.
        if let Some(mut user) = self.inner.api.session().user() {
            user.email_verified = true;
            self.inner.api.session().login(user);
        }
        Ok(())
    }

    // =========================================================================
    // Bootstrap
    // =========================================================================

    /// Re-establish the session from persisted tokens, at most once per
    /// process start.
    ///
    /// Runs only after the session store has hydrated; a call before
    /// hydration defers (the one-shot marker stays unconsumed) so the
    /// persisted credentials still get their restore attempt later. With no
    /// stored access token this is a no-op. A definitive rejection (401/403
    /// surviving the client's refresh-and-retry) logs the user out;
    /// transient failures leave the persisted session alone so the next
    /// start can retry.
    pub async fn bootstrap(&self) {
        let session = self.inner.api.session();
        if !session.hydrated() {
            debug!("session store not hydrated yet, deferring bootstrap");
            return;
        }

        if self
            .inner
            .bootstrapped
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        if session.access_token().is_none() {
            debug!("no stored credentials, skipping session bootstrap");
            return;
        }

        match self.inner.api.get::<User>("/auth/me").await {
            Ok(user) => {
                debug!(user = user.id.as_str(), "session restored");
                session.login(user);
            }
            Err(e) if e.is_unauthorized() => {
                warn!("stored credentials rejected, logging out");
                session.logout();
                session.clear_tokens();
            }
            Err(e) => {
                warn!(error = %e, "session bootstrap failed, keeping persisted session");
            }
        }
    }

    /// Whether [`AuthService::bootstrap`] has already run.
    #[must_use]
    pub fn bootstrapped(&self) -> bool {
        self.inner.bootstrapped.load(Ordering::SeqCst)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn establish_session(&self, payload: AuthPayload) -> Result<User, AuthError> {
        let session = self.inner.api.session();
        session.set_tokens(&payload.access_token, Some(&payload.refresh_token));
        session.login(payload.user.clone());
        Ok(payload.user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
    }

    #[test]
    fn test_weak_password_message() {
        let err = validate_password("abc").unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword(_)));
        assert!(err.to_string().contains("at least 8 characters"));
    }
}
