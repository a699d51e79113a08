//! Integration tests for the 401 refresh-and-retry protocol.
//!
//! Each test scripts a stub backend whose protected endpoint only accepts a
//! specific access token, and asserts on how the client rotates credentials
//! and how many times each endpoint was hit.

use std::sync::Arc;

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use vendora_integration_tests::{
    HitCounter, StubBackend, bearer_token, envelope, error_body, user_json,
};
use vendora_storefront::api::ApiClient;
use vendora_storefront::store::{MemoryStorage, SessionStore};

fn test_session() -> SessionStore {
    let session = SessionStore::new(Arc::new(MemoryStorage::new()));
    session.hydrate();
    session
}

/// Stub with a protected endpoint that only accepts `accepted_token`, and a
/// refresh endpoint that rotates `r1` into that token.
fn refresh_backend(
    accepted_token: &'static str,
    protected_hits: HitCounter,
    refresh_hits: HitCounter,
) -> Router {
    let protected = move |headers: HeaderMap| {
        let hits = protected_hits.clone();
        async move {
            hits.hit();
            if bearer_token(&headers).as_deref() == Some(accepted_token) {
                (StatusCode::OK, Json(envelope(user_json("u_1", "a@b.com"))))
            } else {
                (StatusCode::UNAUTHORIZED, Json(error_body("token expired")))
            }
        }
    };

    let refresh = move |Json(body): Json<Value>| {
        let hits = refresh_hits.clone();
        async move {
            hits.hit();
            if body["refreshToken"] == json!("r1") {
                (
                    StatusCode::OK,
                    Json(envelope(json!({
                        "accessToken": accepted_token,
                        "refreshToken": "r2",
                    }))),
                )
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(error_body("refresh token revoked")),
                )
            }
        }
    };

    Router::new()
        .route("/auth/me", get(protected))
        .route("/auth/refresh", post(refresh))
}

#[tokio::test]
async fn test_expired_token_refreshes_and_retries_once() {
    let protected_hits = HitCounter::new();
    let refresh_hits = HitCounter::new();
    let backend = StubBackend::spawn(refresh_backend(
        "fresh",
        protected_hits.clone(),
        refresh_hits.clone(),
    ))
    .await;

    let session = test_session();
    session.set_tokens("stale", Some("r1"));
    let client = ApiClient::new(&backend.base_url(), session.clone());

    let user: Value = client.get("/auth/me").await.unwrap();
    assert_eq!(user["id"], json!("u_1"));

    // One failed attempt, one retry.
    assert_eq!(protected_hits.count(), 2);
    assert_eq!(refresh_hits.count(), 1);

    // The session now holds the rotated pair.
    assert_eq!(session.access_token().as_deref(), Some("fresh"));
    assert_eq!(session.refresh_token().as_deref(), Some("r2"));
    assert!(session.is_authenticated());
}

#[tokio::test]
async fn test_missing_refresh_token_fails_without_retry() {
    let protected_hits = HitCounter::new();
    let refresh_hits = HitCounter::new();
    let backend = StubBackend::spawn(refresh_backend(
        "fresh",
        protected_hits.clone(),
        refresh_hits.clone(),
    ))
    .await;

    let session = test_session();
    session.set_tokens("stale", None);
    let client = ApiClient::new(&backend.base_url(), session.clone());

    let err = client.get::<Value>("/auth/me").await.unwrap_err();

    // The original 401 surfaces, not a refresh error.
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("token expired"));
    assert_eq!(protected_hits.count(), 1);
    assert_eq!(refresh_hits.count(), 0);

    // The session is wiped after an irrecoverable rejection.
    assert!(session.access_token().is_none());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_rejected_refresh_clears_session_and_surfaces_original_401() {
    let protected_hits = HitCounter::new();
    let refresh_hits = HitCounter::new();
    let backend = StubBackend::spawn(refresh_backend(
        "fresh",
        protected_hits.clone(),
        refresh_hits.clone(),
    ))
    .await;

    let session = test_session();
    // A refresh token the stub does not recognize.
    session.set_tokens("stale", Some("revoked"));
    let client = ApiClient::new(&backend.base_url(), session.clone());

    let err = client.get::<Value>("/auth/me").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("token expired"));
    assert_eq!(protected_hits.count(), 1);
    assert_eq!(refresh_hits.count(), 1);
    assert!(session.access_token().is_none());
}

#[tokio::test]
async fn test_concurrent_401s_coalesce_into_one_refresh() {
    let protected_hits = HitCounter::new();
    let refresh_hits = HitCounter::new();
    let backend = StubBackend::spawn(refresh_backend(
        "fresh",
        protected_hits.clone(),
        refresh_hits.clone(),
    ))
    .await;

    let session = test_session();
    session.set_tokens("stale", Some("r1"));
    let client = ApiClient::new(&backend.base_url(), session.clone());

    let (a, b) = tokio::join!(
        client.get::<Value>("/auth/me"),
        client.get::<Value>("/auth/me"),
    );

    assert!(a.is_ok());
    assert!(b.is_ok());

    // Both callers hit the 401 but only one refresh reached the backend;
    // the second caller reused the rotated token.
    assert_eq!(refresh_hits.count(), 1);
    assert_eq!(session.access_token().as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_non_401_errors_do_not_trigger_refresh() {
    let refresh_hits = HitCounter::new();
    let refresh_hits_for_route = refresh_hits.clone();

    let router = Router::new()
        .route(
            "/flaky",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, Json(error_body("maintenance"))) }),
        )
        .route(
            "/auth/refresh",
            post(move || {
                let hits = refresh_hits_for_route.clone();
                async move {
                    hits.hit();
                    Json(envelope(json!({ "accessToken": "fresh" })))
                }
            }),
        );
    let backend = StubBackend::spawn(router).await;

    let session = test_session();
    session.set_tokens("stale", Some("r1"));
    let client = ApiClient::new(&backend.base_url(), session.clone());

    let err = client.get::<Value>("/flaky").await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(refresh_hits.count(), 0);
    // A 503 is not an auth failure; credentials stay put.
    assert_eq!(session.access_token().as_deref(), Some("stale"));
}
