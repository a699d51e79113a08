//! HTTP client for the backend REST API.
//!
//! Wraps `reqwest` with the platform's conventions: bearer credentials from
//! the session store, the `{ success, data, message }` envelope, and the
//! 401 refresh-and-retry protocol.

use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::ApiError;
use super::types::TokenPair;
use crate::store::SessionStore;

/// Path of the token refresh endpoint, relative to the API base URL.
const REFRESH_PATH: &str = "/auth/refresh";

/// Query parameters for [`ApiClient::get_with`].
///
/// `None` values and empty strings are omitted from the query string;
/// everything else is sent as-is.
pub type QueryParams<'a> = [(&'a str, Option<String>)];

/// Client for the Vendora backend REST API.
///
/// Cheaply cloneable; all handlers share one instance. Holds the session
/// store so credentials are read at call time, never captured at
/// construction.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
    // Serializes token refreshes so concurrent 401s coalesce into one
    // backend call. See refresh_access_token.
    refresh_gate: tokio::sync::Mutex<()>,
}

impl ApiClient {
    /// Create a new API client for the given base URL.
    ///
    /// The base URL should include any path prefix (e.g.
    /// `https://api.example.com/api/v1`); a trailing slash is tolerated.
    #[must_use]
    pub fn new(base_url: &str, session: SessionStore) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                http: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
                session,
                refresh_gate: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// The session store this client reads credentials from.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.inner.session
    }

    // =========================================================================
    // Verbs
    // =========================================================================

    /// GET a resource.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-2xx status (after the 401
    /// retry policy), or if the payload does not match `T`.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.request(Method::GET, path, &[], None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// GET a resource with query parameters.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn get_with<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams<'_>,
    ) -> Result<T, ApiError> {
        let value = self.request(Method::GET, path, query, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// POST a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`], plus serialization failures for `body`.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        let value = self.request(Method::POST, path, &[], Some(body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// PUT a JSON body.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::post`].
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &impl Serialize,
    ) -> Result<T, ApiError> {
        let body = serde_json::to_value(body)?;
        let value = self.request(Method::PUT, path, &[], Some(body)).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// DELETE a resource.
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::get`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let value = self.request(Method::DELETE, path, &[], None).await?;
        Ok(serde_json::from_value(value)?)
    }

    // =========================================================================
    // Request pipeline
    // =========================================================================

    /// Issue a request and apply the retry protocol.
    ///
    /// State machine per request: {issue request} -> on 401 -> {refresh} ->
    /// on success {retry once} / on failure {clear session, propagate the
    /// original 401}. Network-level failures propagate immediately with no
    /// retry.
    #[instrument(skip(self, body), fields(method = %method, path = %path))]
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams<'_>,
        body: Option<Value>,
    ) -> Result<Value, ApiError> {
        let token = self.inner.session.access_token();
        let response = self
            .send(method.clone(), path, query, body.as_ref(), token.as_deref())
            .await?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::unwrap_response(response).await;
        }

        // Keep the original 401 so it can be surfaced verbatim when the
        // refresh path is unavailable.
        let original = Self::error_from_response(response).await;

        match self.refresh_access_token(token.as_deref()).await {
            Ok(fresh_token) => {
                debug!("retrying request with refreshed access token");
                let retried = self
                    .send(method, path, query, body.as_ref(), Some(&fresh_token))
                    .await?;
                Self::unwrap_response(retried).await
            }
            Err(refresh_err) => {
                warn!(error = %refresh_err, "token refresh failed, clearing session");
                self.inner.session.clear();
                Err(original)
            }
        }
    }

    /// Send one HTTP request. No retry logic here.
    async fn send(
        &self,
        method: Method,
        path: &str,
        query: &QueryParams<'_>,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = format!("{}{}", self.inner.base_url, normalize_path(path));

        let mut request = self
            .inner
            .http
            .request(method, &url)
            .header("Content-Type", "application/json");

        let pairs = filter_query(query);
        if !pairs.is_empty() {
            request = request.query(&pairs);
        }

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        Ok(request.send().await?)
    }

    /// Refresh the access token using the stored refresh token.
    ///
    /// Concurrent callers coalesce: the gate serializes refreshes, and a
    /// caller that acquires it after another request already rotated the
    /// token skips the redundant backend call and reuses the fresh token.
    /// `stale_token` is the access token the failed request carried.
    async fn refresh_access_token(&self, stale_token: Option<&str>) -> Result<String, ApiError> {
        let _guard = self.inner.refresh_gate.lock().await;

        if let Some(current) = self.inner.session.access_token()
            && Some(current.as_str()) != stale_token
        {
            return Ok(current);
        }

        let refresh_token = self.inner.session.refresh_token().ok_or_else(|| {
            ApiError::Status {
                status: 401,
                message: "no refresh token stored".to_string(),
                body: None,
            }
        })?;

        let url = format!("{}{}", self.inner.base_url, REFRESH_PATH);
        let response = self
            .inner
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&serde_json::json!({ "refreshToken": refresh_token }))
            .send()
            .await?;

        let value = Self::unwrap_response(response).await?;
        let pair: TokenPair = serde_json::from_value(value)?;

        // Writing tokens preserves the persisted user fields and flips the
        // authenticated flag; only the token fields are overwritten.
        self.inner
            .session
            .set_tokens(&pair.access_token, pair.refresh_token.as_deref());

        Ok(pair.access_token)
    }

    // =========================================================================
    // Envelope handling
    // =========================================================================

    /// Normalize a response into its unwrapped JSON payload.
    async fn unwrap_response(response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        if !status.is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let text = response.text().await?;
        if text.is_empty() {
            return Ok(Value::Null);
        }

        let value: Value = serde_json::from_str(&text)?;
        Ok(unwrap_envelope(value))
    }

    /// Build the typed error for a non-2xx response.
    async fn error_from_response(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body: Option<Value> = match response.text().await {
            Ok(text) => serde_json::from_str(&text).ok(),
            Err(_) => None,
        };

        let message = body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
            .map_or_else(
                || format!("request failed with status {status}"),
                str::to_owned,
            );

        ApiError::Status {
            status,
            message,
            body,
        }
    }
}

/// Normalize a path to exactly one leading slash.
fn normalize_path(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Drop query parameters that are `None` or empty strings.
fn filter_query(query: &QueryParams<'_>) -> Vec<(String, String)> {
    query
        .iter()
        .filter_map(|(key, value)| match value {
            Some(v) if !v.is_empty() => Some(((*key).to_string(), v.clone())),
            _ => None,
        })
        .collect()
}

/// Unwrap the `{ success, data, message }` envelope.
///
/// Bodies carrying a `success` field unwrap to `data` (or the whole payload
/// when `data` is absent); anything else passes through untouched.
fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("success") => {
            map.remove("data").unwrap_or(Value::Object(map))
        }
        other => other,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("products"), "/products");
        assert_eq!(normalize_path("/products"), "/products");
        assert_eq!(normalize_path("//products"), "/products");
        assert_eq!(normalize_path("/products/p_1"), "/products/p_1");
    }

    #[test]
    fn test_filter_query_omits_none_and_empty() {
        let query = [
            ("page", Some("2".to_string())),
            ("q", None),
            ("category", Some(String::new())),
            ("sort", Some("price".to_string())),
        ];

        let pairs = filter_query(&query);
        assert_eq!(
            pairs,
            vec![
                ("page".to_string(), "2".to_string()),
                ("sort".to_string(), "price".to_string()),
            ]
        );
    }

    #[test]
    fn test_unwrap_envelope_with_data() {
        let value = json!({ "success": true, "data": { "id": "p_1" }, "message": "ok" });
        assert_eq!(unwrap_envelope(value), json!({ "id": "p_1" }));
    }

    #[test]
    fn test_unwrap_envelope_without_data() {
        let value = json!({ "success": true, "message": "deleted" });
        assert_eq!(
            unwrap_envelope(value),
            json!({ "success": true, "message": "deleted" })
        );
    }

    #[test]
    fn test_unwrap_envelope_passthrough() {
        let value = json!({ "id": "p_1", "name": "Lamp" });
        assert_eq!(unwrap_envelope(value.clone()), value);

        let list = json!([1, 2, 3]);
        assert_eq!(unwrap_envelope(list.clone()), list);
    }
}
