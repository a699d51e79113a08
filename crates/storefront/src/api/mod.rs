//! Backend REST API client.
//!
//! Every call to the Vendora backend goes through [`ApiClient`] - the single
//! choke point that attaches credentials, normalizes the response envelope,
//! and drives the 401 refresh-and-retry protocol.
//!
//! # Envelope
//!
//! Most backend responses use the `{ success, data, message }` wrapper. The
//! client unwraps these to their `data` payload; plain JSON bodies pass
//! through untouched; 204 responses yield an empty value.
//!
//! # Example
//!
//! ```rust,ignore
//! use vendora_storefront::api::ApiClient;
//!
//! let client = ApiClient::new(&config, session.clone());
//!
//! // Typed GET with query parameters (None / empty values are omitted)
//! let page: Paginated<Product> = client
//!     .get_with("/products", &[("page", Some("2".into())), ("q", None)])
//!     .await?;
//! ```

mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure (no response). Never retried.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body could not be parsed as the expected JSON shape.
    #[error("json parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The backend returned a non-2xx status (after the retry policy has
    /// been applied). Carries the backend-provided message when the body
    /// was parseable, and the parsed body itself for call sites that need
    /// field-level detail.
    #[error("{message} (status {status})")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message from the body's `message` field, or a generic fallback.
        message: String,
        /// Parsed response body, when the backend sent JSON.
        body: Option<Value>,
    },
}

impl ApiError {
    /// HTTP status code for [`ApiError::Status`] errors.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this is an authorization failure (401 or 403).
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = ApiError::Status {
            status: 404,
            message: "Product not found".to_string(),
            body: None,
        };
        assert_eq!(err.to_string(), "Product not found (status 404)");
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_unauthorized_classification() {
        for status in [401, 403] {
            let err = ApiError::Status {
                status,
                message: "unauthorized".to_string(),
                body: None,
            };
            assert!(err.is_unauthorized());
        }
    }
}
