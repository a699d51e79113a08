//! Integration test harness for Vendora.
//!
//! Tests here exercise the storefront's API client and stores against a
//! stub backend: a real axum server bound to an ephemeral localhost port,
//! scripted per test. No external services are involved.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vendora-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use axum::http::HeaderMap;
use serde_json::{Value, json};
use tokio::task::JoinHandle;

/// A stub backend server running on an ephemeral localhost port.
///
/// The server task is aborted on drop.
pub struct StubBackend {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl StubBackend {
    /// Bind the given router on 127.0.0.1:0 and start serving it.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind; tests have no meaningful way to
    /// recover from that.
    pub async fn spawn(router: Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind stub backend listener");
        let addr = listener.local_addr().expect("listener has no local addr");

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("stub backend server error");
        });

        Self { addr, handle }
    }

    /// Base URL for pointing an API client at this stub.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for StubBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Shared hit counter for asserting how often a stub endpoint was called.
#[derive(Debug, Default, Clone)]
pub struct HitCounter {
    hits: Arc<AtomicUsize>,
}

impl HitCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one hit and return the count before this one.
    pub fn hit(&self) -> usize {
        self.hits.fetch_add(1, Ordering::SeqCst)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// Wrap a payload in the backend's `{ success, data }` envelope.
#[must_use]
pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "data": data, "message": "ok" })
}

/// The backend's error body shape.
#[must_use]
pub fn error_body(message: &str) -> Value {
    json!({ "success": false, "message": message })
}

/// Extract the bearer token from request headers, if any.
#[must_use]
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(String::from)
}

/// A minimal product payload in the backend wire format.
#[must_use]
pub fn product_json(id: &str, slug: &str, price: &str, stock: u32) -> Value {
    json!({
        "id": id,
        "name": format!("Product {id}"),
        "slug": slug,
        "price": price,
        "stockCount": stock,
        "shopId": "s_1",
    })
}

/// A minimal user payload in the backend wire format.
#[must_use]
pub fn user_json(id: &str, email: &str) -> Value {
    json!({
        "id": id,
        "name": "Test User",
        "email": email,
        "role": "USER",
        "emailVerified": true,
    })
}
