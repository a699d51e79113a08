//! Payments service.
//!
//! Thin wrapper over the backend payment endpoints. The backend owns the
//! processor integration; this side only creates intents and hands the
//! client secret to the hosted payment element. Card data never transits
//! this service.

use rust_decimal::Decimal;
use serde_json::json;
use tracing::instrument;

use vendora_core::OrderId;

use crate::api::types::PaymentIntent;
use crate::api::{ApiClient, ApiError};

/// Payments service.
#[derive(Clone)]
pub struct PaymentsService {
    api: ApiClient,
}

impl PaymentsService {
    /// Create a new payments service over the shared API client.
    #[must_use]
    pub const fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Create a payment intent for an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the order is not payable or the request fails.
    #[instrument(skip(self))]
    pub async fn create_intent(
        &self,
        order_id: &OrderId,
        amount: Decimal,
    ) -> Result<PaymentIntent, ApiError> {
        self.api
            .post(
                "/payments/intent",
                &json!({ "orderId": order_id.as_str(), "amount": amount }),
            )
            .await
    }
}
