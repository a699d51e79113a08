//! HTTP route handlers for storefront.
//!
//! Every handler responds with the `{ success, data }` envelope, mirroring
//! the backend wire format so clients parse one shape end to end.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                  - Liveness check
//! GET  /health/ready            - Readiness check (probes the backend API)
//!
//! # Catalog
//! GET  /products                - Product listing (filters, search, pagination)
//! GET  /products/{slug}         - Product detail
//! GET  /categories              - Category listing
//! GET  /brands                  - Brand listing
//! GET  /shops                   - Shop listing
//! GET  /shops/{slug}            - Shop detail
//!
//! # Cart
//! GET  /cart                    - Cart view (items, totals, drawer flag)
//! POST /cart/add                - Add a product by slug
//! POST /cart/update             - Set a line's quantity
//! POST /cart/remove             - Remove a line
//! GET  /cart/count              - Item count for the cart badge
//! POST /cart/clear              - Empty the cart
//! POST /cart/toggle             - Toggle the drawer flag
//!
//! # Auth
//! POST /auth/login              - Login
//! POST /auth/register           - Register
//! POST /auth/logout             - Logout
//! GET  /auth/me                 - Current user
//! PUT  /auth/profile            - Update profile
//! POST /auth/forgot-password    - Request password reset
//! POST /auth/reset-password     - Complete password reset
//! POST /auth/verify-email       - Confirm email address
//!
//! # Account (requires auth)
//! GET  /account/orders          - Order history
//! GET  /account/orders/{id}     - Order detail
//! POST /account/orders/{id}/cancel - Cancel a pending order
//! GET  /account/returns         - Return requests
//! POST /account/returns         - Open a return
//! GET  /account/addresses       - Address list
//! POST /account/addresses       - Create address
//! PUT  /account/addresses/{id}  - Update address
//! DELETE /account/addresses/{id} - Delete address
//! GET  /account/wishlist        - Wishlist
//! POST /account/wishlist        - Add to wishlist
//! DELETE /account/wishlist/{id} - Remove from wishlist
//! GET  /account/notifications   - Notifications
//! POST /account/notifications/{id}/read - Mark notification read
//!
//! # Checkout (requires auth)
//! POST /checkout                - Place an order from the cart
//! POST /checkout/coupon         - Validate a coupon against the cart
//! POST /checkout/payment-intent - Create a payment intent
//!
//! # Dashboard (requires vendor or admin role)
//! GET  /dashboard/summary       - Sales summary
//!
//! # Content
//! GET  /pages/{slug}            - Static page (FAQ, careers, ...)
//! GET  /blog                    - Blog index
//! GET  /blog/{slug}             - Blog post
//! POST /contact                 - Contact form submission
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod contact;
pub mod dashboard;
pub mod health;
pub mod pages;
pub mod products;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{slug}", get(products::show))
        .route("/categories", get(products::categories))
        .route("/brands", get(products::brands))
        .route("/shops", get(products::shops))
        .route("/shops/{slug}", get(products::shop))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/count", get(cart::count))
        .route("/clear", post(cart::clear))
        .route("/toggle", post(cart::toggle))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/profile", put(auth::update_profile))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route("/verify-email", post(auth::verify_email))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(account::orders))
        .route("/orders/{id}", get(account::order))
        .route("/orders/{id}/cancel", post(account::cancel_order))
        .route("/returns", get(account::returns).post(account::request_return))
        .route(
            "/addresses",
            get(account::addresses).post(account::create_address),
        )
        .route(
            "/addresses/{id}",
            put(account::update_address).delete(account::delete_address),
        )
        .route(
            "/wishlist",
            get(account::wishlist).post(account::add_to_wishlist),
        )
        .route("/wishlist/{id}", delete(account::remove_from_wishlist))
        .route("/notifications", get(account::notifications))
        .route(
            "/notifications/{id}/read",
            post(account::mark_notification_read),
        )
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout::place_order))
        .route("/coupon", post(checkout::validate_coupon))
        .route("/payment-intent", post(checkout::payment_intent))
}

/// Create the content routes router.
pub fn content_routes() -> Router<AppState> {
    Router::new()
        .route("/pages/{slug}", get(pages::page))
        .route("/blog", get(pages::blog_index))
        .route("/blog/{slug}", get(pages::blog_post))
        .route("/contact", post(contact::submit))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .merge(catalog_routes())
        .nest("/cart", cart_routes())
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
        .nest("/checkout", checkout_routes())
        .route("/dashboard/summary", get(dashboard::summary))
        .merge(content_routes())
}

/// Wrap a payload in the `{ success, data }` envelope.
pub(crate) fn ok<T: serde::Serialize>(data: T) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "success": true, "data": data }))
}
