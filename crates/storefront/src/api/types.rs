//! Domain types for the Vendora backend REST API.
//!
//! These mirror the backend's camelCase JSON wire format. Monetary amounts
//! are decimals; identifiers are the opaque string IDs from `vendora-core`.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use vendora_core::{
    AddressId, BrandId, CategoryId, CurrencyCode, Email, NotificationId, OrderId, OrderStatus,
    ProductId, ReturnId, Role, ShopId, UserId,
};

// =============================================================================
// Users & Auth
// =============================================================================

/// A platform account as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
}

/// Partial user fields for profile updates.
///
/// `None` fields are left untouched by [`crate::store::SessionStore::update_user`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Payload of a successful login or registration response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Payload of a successful token refresh response.
///
/// The backend may rotate the refresh token; when absent the stored one
/// stays valid.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

// =============================================================================
// Catalog
// =============================================================================

/// A product listing.
///
/// Cart line items capture this struct as a snapshot; the captured `price`
/// and `stock_count` are what cart totals and clamping use, not a live
/// re-fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default)]
    pub compare_price: Option<Decimal>,
    #[serde(default)]
    pub currency_code: CurrencyCode,
    pub stock_count: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub brand_id: Option<BrandId>,
    pub shop_id: ShopId,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
}

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// A brand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub logo: Option<String>,
}

/// A vendor shop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: ShopId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: String,
    pub owner_id: UserId,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// A page of results from a paginated listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
}

// =============================================================================
// Orders & Returns
// =============================================================================

/// A single line within an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub total: Decimal,
    #[serde(default)]
    pub currency_code: CurrencyCode,
    pub created_at: DateTime<Utc>,
}

/// Input for placing an order at checkout.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub items: Vec<OrderItemInput>,
    pub address_id: AddressId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
}

/// A requested order line.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: ProductId,
    pub quantity: u32,
}

/// A return request for a delivered order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Return {
    pub id: ReturnId,
    pub order_id: OrderId,
    pub reason: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Input for opening a return.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnInput {
    pub order_id: OrderId,
    pub reason: String,
}

// =============================================================================
// Addresses, Wishlist, Notifications, Coupons
// =============================================================================

/// A saved shipping address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    #[serde(default)]
    pub label: Option<String>,
    pub line1: String,
    #[serde(default)]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default)]
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Input for creating or updating an address.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub line1: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub postal_code: String,
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

/// A wishlist entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub product: Product,
    pub added_at: DateTime<Utc>,
}

/// A user notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Result of validating a coupon code against the current cart total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponValidation {
    pub valid: bool,
    #[serde(default)]
    pub discount_amount: Option<Decimal>,
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Payments & Analytics
// =============================================================================

/// Payment intent created by the backend.
///
/// The hosted payment element consumes `client_secret`; this service never
/// touches card data.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntent {
    pub client_secret: String,
    pub amount: Decimal,
    #[serde(default)]
    pub currency_code: CurrencyCode,
}

/// Aggregated sales figures for vendor and admin dashboards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_sales: Decimal,
    pub order_count: u64,
    #[serde(default)]
    pub customer_count: u64,
    #[serde(default)]
    pub pending_orders: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_wire_format() {
        let json = r#"{
            "id": "u_1",
            "name": "Ada",
            "email": "ada@example.com",
            "role": "VENDOR",
            "phone": null,
            "emailVerified": true
        }"#;

        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Vendor);
        assert!(user.email_verified);
        assert!(user.avatar_url.is_none());
    }

    #[test]
    fn test_token_pair_optional_rotation() {
        let pair: TokenPair =
            serde_json::from_str(r#"{"accessToken": "a2"}"#).unwrap();
        assert_eq!(pair.access_token, "a2");
        assert!(pair.refresh_token.is_none());
    }

    #[test]
    fn test_product_defaults() {
        let json = r#"{
            "id": "p_1",
            "name": "Desk Lamp",
            "slug": "desk-lamp",
            "price": "29.99",
            "stockCount": 12,
            "shopId": "s_1"
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.stock_count, 12);
        assert_eq!(product.currency_code, CurrencyCode::USD);
        assert!(product.images.is_empty());
    }

    #[test]
    fn test_paginated_roundtrip() {
        let json = r#"{
            "data": [{"id": "c_1", "name": "Lighting", "slug": "lighting"}],
            "total": 1,
            "page": 1,
            "totalPages": 1
        }"#;

        let page: Paginated<Category> = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.total_pages, 1);
    }
}
