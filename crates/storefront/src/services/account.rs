//! Account service.
//!
//! Authenticated user resources: orders, returns, addresses, wishlist,
//! notifications, and coupon validation. Every call rides the shared API
//! client, so the bearer header and 401 retry protocol apply uniformly.
//! Nothing here is cached; these resources are user-specific and mutate
//! often.

use serde_json::json;
use tracing::instrument;

use vendora_core::{AddressId, NotificationId, OrderId, ProductId};

use crate::api::types::{
    Address, AddressInput, CouponValidation, Notification, Order, OrderInput, Paginated, Return,
    ReturnInput, SalesSummary, WishlistItem,
};
use crate::api::{ApiClient, ApiError};

/// Account service.
#[derive(Clone)]
pub struct AccountService {
    api: ApiClient,
}

impl AccountService {
    /// Create a new account service over the shared API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Get a page of the current user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn orders(&self, page: Option<u32>) -> Result<Paginated<Order>, ApiError> {
        let query = [("page", page.map(|p| p.to_string()))];
        self.api.get_with("/orders", &query).await
    }

    /// Get a single order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not found or the request fails.
    pub async fn order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.api.get(&format!("/orders/{}", id.as_str())).await
    }

    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the order (stock changes,
    /// invalid address) or the request fails.
    #[instrument(skip(self, input))]
    pub async fn place_order(&self, input: &OrderInput) -> Result<Order, ApiError> {
        self.api.post("/orders", input).await
    }

    /// Cancel a pending order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order can no longer be cancelled.
    pub async fn cancel_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        self.api
            .put(&format!("/orders/{}/cancel", id.as_str()), &json!({}))
            .await
    }

    // =========================================================================
    // Returns
    // =========================================================================

    /// Get the current user's return requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn returns(&self) -> Result<Vec<Return>, ApiError> {
        self.api.get("/returns").await
    }

    /// Open a return request for a delivered order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not eligible for return.
    #[instrument(skip(self, input))]
    pub async fn request_return(&self, input: &ReturnInput) -> Result<Return, ApiError> {
        self.api.post("/returns", input).await
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// Get the current user's saved addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn addresses(&self) -> Result<Vec<Address>, ApiError> {
        self.api.get("/addresses").await
    }

    /// Save a new address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn create_address(&self, input: &AddressInput) -> Result<Address, ApiError> {
        self.api.post("/addresses", input).await
    }

    /// Update an existing address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not found or the request fails.
    pub async fn update_address(
        &self,
        id: &AddressId,
        input: &AddressInput,
    ) -> Result<Address, ApiError> {
        self.api
            .put(&format!("/addresses/{}", id.as_str()), input)
            .await
    }

    /// Delete an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn delete_address(&self, id: &AddressId) -> Result<(), ApiError> {
        self.api
            .delete::<serde_json::Value>(&format!("/addresses/{}", id.as_str()))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Wishlist
    // =========================================================================

    /// Get the current user's wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn wishlist(&self) -> Result<Vec<WishlistItem>, ApiError> {
        self.api.get("/wishlist").await
    }

    /// Add a product to the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn add_to_wishlist(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.api
            .post::<serde_json::Value>("/wishlist", &json!({ "productId": product_id.as_str() }))
            .await?;
        Ok(())
    }

    /// Remove a product from the wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn remove_from_wishlist(&self, product_id: &ProductId) -> Result<(), ApiError> {
        self.api
            .delete::<serde_json::Value>(&format!("/wishlist/{}", product_id.as_str()))
            .await?;
        Ok(())
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Get the current user's notifications.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn notifications(&self) -> Result<Vec<Notification>, ApiError> {
        self.api.get("/notifications").await
    }

    /// Mark a notification as read.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    pub async fn mark_notification_read(&self, id: &NotificationId) -> Result<(), ApiError> {
        self.api
            .put::<serde_json::Value>(
                &format!("/notifications/{}/read", id.as_str()),
                &json!({}),
            )
            .await?;
        Ok(())
    }

    // =========================================================================
    // Coupons & Dashboards
    // =========================================================================

    /// Validate a coupon code against the current cart total.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails. An invalid coupon is a
    /// successful response with `valid: false`, not an error.
    #[instrument(skip(self), fields(code = %code))]
    pub async fn validate_coupon(
        &self,
        code: &str,
        cart_total: rust_decimal::Decimal,
    ) -> Result<CouponValidation, ApiError> {
        self.api
            .post(
                "/coupons/validate",
                &json!({ "code": code, "cartTotal": cart_total }),
            )
            .await
    }

    /// Aggregated sales figures for the current vendor or admin.
    ///
    /// # Errors
    ///
    /// Returns an error if the caller lacks the role or the request fails.
    pub async fn sales_summary(&self) -> Result<SalesSummary, ApiError> {
        self.api.get("/dashboard/summary").await
    }
}
