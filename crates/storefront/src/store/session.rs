//! Auth session store.
//!
//! Process-wide record of who is logged in, hydrated once per process start
//! from durable storage before any consumer reads it. Exactly one store
//! exists per process (constructed in `AppState`), but nothing here is
//! global - tests build isolated instances over [`MemoryStorage`].
//!
//! Persisted fields (single durable key): `user`, `isAuthenticated`, and the
//! token pair. The `hydrated` marker is always computed fresh per start and
//! never read back from storage. Tokens are owned exclusively by this layer;
//! they are handed to the API client for the bearer header and are never
//! exposed through route responses.

use std::fmt;
use std::sync::{Arc, RwLock};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::persist::{StateStorage, load_state, save_state};
use crate::api::types::{User, UserPatch};

#[cfg(test)]
use super::persist::MemoryStorage;

/// Durable storage key for the auth session.
pub const SESSION_STORAGE_KEY: &str = "vendora.auth";

/// Snapshot format version.
const SESSION_VERSION: u32 = 1;

/// The persisted part of the session, in its storage wire format.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionSnapshot {
    #[serde(default)]
    user: Option<User>,
    #[serde(default)]
    is_authenticated: bool,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// In-memory session state. Tokens live as secrets; `hydrated` is never
/// persisted.
#[derive(Default)]
struct SessionState {
    user: Option<User>,
    is_authenticated: bool,
    access_token: Option<SecretString>,
    refresh_token: Option<SecretString>,
    hydrated: bool,
}

/// Process-wide auth session store.
///
/// Cheaply cloneable; all clones share the same state and storage.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionStoreInner>,
}

struct SessionStoreInner {
    storage: Arc<dyn StateStorage>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Create a store over the given storage. The store starts empty and
    /// un-hydrated; call [`SessionStore::hydrate`] before reading.
    #[must_use]
    pub fn new(storage: Arc<dyn StateStorage>) -> Self {
        Self {
            inner: Arc::new(SessionStoreInner {
                storage,
                state: RwLock::new(SessionState::default()),
            }),
        }
    }

    /// Convenience constructor over an in-memory fake, for tests.
    #[cfg(test)]
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    // =========================================================================
    // Hydration
    // =========================================================================

    /// Load the persisted snapshot, once.
    ///
    /// Flips `hydrated` to true exactly once; later calls are no-ops that
    /// return `false`. A missing or unreadable snapshot still completes
    /// hydration (with an empty session) - dependent consumers only need to
    /// know that it is now safe to decide whether to fetch user-scoped data.
    pub fn hydrate(&self) -> bool {
        let mut state = self.write();
        if state.hydrated {
            return false;
        }

        match load_state::<SessionSnapshot>(
            self.inner.storage.as_ref(),
            SESSION_STORAGE_KEY,
            SESSION_VERSION,
        ) {
            Ok(Some(snapshot)) => {
                state.user = snapshot.user;
                state.is_authenticated = snapshot.is_authenticated;
                state.access_token = snapshot.access_token.map(SecretString::from);
                state.refresh_token = snapshot.refresh_token.map(SecretString::from);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "failed to load persisted session, starting empty");
            }
        }

        state.hydrated = true;
        true
    }

    /// Whether the persisted snapshot has been loaded this process start.
    #[must_use]
    pub fn hydrated(&self) -> bool {
        self.read().hydrated
    }

    // =========================================================================
    // User state
    // =========================================================================

    /// Record a successful login. Sets the user and marks the session
    /// authenticated. Tokens are not touched here - they are written by the
    /// API client's refresh path or by the login/register call site.
    pub fn login(&self, user: User) {
        {
            let mut state = self.write();
            state.user = Some(user);
            state.is_authenticated = true;
        }
        self.persist();
    }

    /// Clear the user record and authenticated flag. Does not clear tokens;
    /// the caller's explicit token-clearing path handles those, typically
    /// alongside a backend logout call.
    pub fn logout(&self) {
        {
            let mut state = self.write();
            state.user = None;
            state.is_authenticated = false;
        }
        self.persist();
    }

    /// Merge the given fields into the current user record.
    ///
    /// No-ops if no user is present.
    pub fn update_user(&self, patch: &UserPatch) {
        {
            let mut state = self.write();
            let Some(user) = state.user.as_mut() else {
                return;
            };
            if let Some(name) = &patch.name {
                user.name.clone_from(name);
            }
            if let Some(phone) = &patch.phone {
                user.phone = Some(phone.clone());
            }
            if let Some(avatar_url) = &patch.avatar_url {
                user.avatar_url = Some(avatar_url.clone());
            }
        }
        self.persist();
    }

    /// The current user, if any.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.read().user.clone()
    }

    /// Whether a user is currently marked as logged in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    // =========================================================================
    // Tokens
    // =========================================================================

    /// Store a new token pair.
    ///
    /// Overwrites only the token fields and the derived authenticated flag;
    /// all other persisted fields (the user record) are preserved. A `None`
    /// refresh token keeps the stored one (the backend does not always
    /// rotate it).
    pub fn set_tokens(&self, access_token: &str, refresh_token: Option<&str>) {
        {
            let mut state = self.write();
            state.access_token = Some(SecretString::from(access_token));
            if let Some(refresh) = refresh_token {
                state.refresh_token = Some(SecretString::from(refresh));
            }
            state.is_authenticated = true;
        }
        self.persist();
    }

    /// Drop both tokens, preserving the rest of the persisted state.
    pub fn clear_tokens(&self) {
        {
            let mut state = self.write();
            state.access_token = None;
            state.refresh_token = None;
        }
        self.persist();
    }

    /// Wipe the whole session: user, flag, and tokens. Used when an
    /// authorization failure is irrecoverable.
    pub fn clear(&self) {
        {
            let mut state = self.write();
            state.user = None;
            state.is_authenticated = false;
            state.access_token = None;
            state.refresh_token = None;
        }
        if let Err(e) = self.inner.storage.clear(SESSION_STORAGE_KEY) {
            tracing::warn!(error = %e, "failed to clear persisted session");
        }
    }

    /// The current access token, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.read()
            .access_token
            .as_ref()
            .map(|t| t.expose_secret().to_string())
    }

    /// The current refresh token, if any.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.read()
            .refresh_token
            .as_ref()
            .map(|t| t.expose_secret().to_string())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn read(&self) -> std::sync::RwLockReadGuard<'_, SessionState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, SessionState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Write the current persisted fields back to storage. Storage failures
    /// are logged, not propagated - in-memory state stays authoritative for
    /// the rest of the process lifetime.
    fn persist(&self) {
        let snapshot = {
            let state = self.read();
            SessionSnapshot {
                user: state.user.clone(),
                is_authenticated: state.is_authenticated,
                access_token: state
                    .access_token
                    .as_ref()
                    .map(|t| t.expose_secret().to_string()),
                refresh_token: state
                    .refresh_token
                    .as_ref()
                    .map(|t| t.expose_secret().to_string()),
            }
        };

        if let Err(e) = save_state(
            self.inner.storage.as_ref(),
            SESSION_STORAGE_KEY,
            SESSION_VERSION,
            &snapshot,
        ) {
            tracing::warn!(error = %e, "failed to persist session");
        }
    }
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("SessionStore")
            .field("user", &state.user.as_ref().map(|u| u.id.as_str()))
            .field("is_authenticated", &state.is_authenticated)
            .field("hydrated", &state.hydrated)
            .field("access_token", &state.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("refresh_token", &state.refresh_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}
