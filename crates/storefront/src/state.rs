//! Application state shared across handlers.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::StorefrontConfig;
use crate::content::{ContentError, ContentStore};
use crate::services::{AccountService, AuthService, CatalogService, PaymentsService};
use crate::store::{CartStore, FileStorage, SessionStore, StateStorage};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// stores, the API client, and the services built over them.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    session: SessionStore,
    cart: CartStore,
    api: ApiClient,
    auth: AuthService,
    catalog: CatalogService,
    account: AccountService,
    payments: PaymentsService,
    content: ContentStore,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Builds file-backed stores under the configured data directory and
    /// wires the API client and services over them. Stores are created
    /// un-hydrated; `main` hydrates them before serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the content directory cannot be read.
    pub fn new(config: StorefrontConfig) -> Result<Self, ContentError> {
        let storage: Arc<dyn StateStorage> = Arc::new(FileStorage::new(&config.data_dir));

        let session = SessionStore::new(Arc::clone(&storage));
        let cart = CartStore::new(storage);
        let api = ApiClient::new(&config.api_base_url, session.clone());

        let auth = AuthService::new(api.clone());
        let catalog = CatalogService::new(api.clone());
        let account = AccountService::new(api.clone());
        let payments = PaymentsService::new(api.clone());
        let content = ContentStore::load(&config.content_dir)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                session,
                cart,
                api,
                auth,
                catalog,
                account,
                payments,
                content,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the backend API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    /// Get a reference to the authentication service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the catalog service.
    #[must_use]
    pub fn catalog(&self) -> &CatalogService {
        &self.inner.catalog
    }

    /// Get a reference to the account service.
    #[must_use]
    pub fn account(&self) -> &AccountService {
        &self.inner.account
    }

    /// Get a reference to the payments service.
    #[must_use]
    pub fn payments(&self) -> &PaymentsService {
        &self.inner.payments
    }

    /// Get a reference to the content store.
    #[must_use]
    pub fn content(&self) -> &ContentStore {
        &self.inner.content
    }
}
