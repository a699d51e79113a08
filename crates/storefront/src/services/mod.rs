//! Business services.
//!
//! Each service composes the API client with the relevant store and exposes
//! the operations route handlers call. Services own no state of their own
//! beyond caches; user and cart state lives in the stores.

pub mod account;
pub mod auth;
pub mod catalog;
pub mod payments;

pub use account::AccountService;
pub use auth::{AuthError, AuthService};
pub use catalog::CatalogService;
pub use payments::PaymentsService;
