//! Integration tests for the backend API client: envelope handling, path
//! and query normalization, and error mapping.

use std::sync::Arc;

use axum::extract::RawQuery;
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use serde_json::{Value, json};

use vendora_integration_tests::{StubBackend, envelope, error_body, product_json};
use vendora_storefront::api::ApiClient;
use vendora_storefront::api::types::Product;
use vendora_storefront::store::{MemoryStorage, SessionStore};

fn test_session() -> SessionStore {
    let session = SessionStore::new(Arc::new(MemoryStorage::new()));
    session.hydrate();
    session
}

#[tokio::test]
async fn test_enveloped_response_unwraps_to_data() {
    let router = Router::new().route(
        "/products/desk-lamp",
        get(|| async { Json(envelope(product_json("p_1", "desk-lamp", "29.99", 12))) }),
    );
    let backend = StubBackend::spawn(router).await;

    let client = ApiClient::new(&backend.base_url(), test_session());
    let product: Product = client.get("/products/desk-lamp").await.unwrap();

    assert_eq!(product.slug, "desk-lamp");
    assert_eq!(product.stock_count, 12);
}

#[tokio::test]
async fn test_plain_body_passes_through() {
    let router = Router::new().route(
        "/raw",
        get(|| async { Json(json!({ "id": "p_1", "name": "Lamp" })) }),
    );
    let backend = StubBackend::spawn(router).await;

    let client = ApiClient::new(&backend.base_url(), test_session());
    let value: Value = client.get("/raw").await.unwrap();

    assert_eq!(value, json!({ "id": "p_1", "name": "Lamp" }));
}

#[tokio::test]
async fn test_no_content_response_is_null() {
    let router = Router::new().route("/gone", delete(|| async { StatusCode::NO_CONTENT }));
    let backend = StubBackend::spawn(router).await;

    let client = ApiClient::new(&backend.base_url(), test_session());
    let value: Value = client.delete("/gone").await.unwrap();

    assert_eq!(value, Value::Null);
}

#[tokio::test]
async fn test_query_params_omit_none_and_empty() {
    // Echo the raw query string so the test sees exactly what was sent.
    let router = Router::new().route(
        "/echo",
        get(|RawQuery(query): RawQuery| async move {
            Json(json!({ "query": query.unwrap_or_default() }))
        }),
    );
    let backend = StubBackend::spawn(router).await;

    let client = ApiClient::new(&backend.base_url(), test_session());
    // Path without a leading slash must also resolve.
    let value: Value = client
        .get_with(
            "echo",
            &[
                ("page", Some("2".to_string())),
                ("q", None),
                ("category", Some(String::new())),
                ("sort", Some("price".to_string())),
            ],
        )
        .await
        .unwrap();

    let query = value["query"].as_str().unwrap();
    assert!(query.contains("page=2"));
    assert!(query.contains("sort=price"));
    assert!(!query.contains("q="));
    assert!(!query.contains("category"));
}

#[tokio::test]
async fn test_error_status_carries_backend_message() {
    let router = Router::new().route(
        "/products/missing",
        get(|| async {
            (
                StatusCode::NOT_FOUND,
                Json(error_body("product not found")),
            )
        }),
    );
    let backend = StubBackend::spawn(router).await;

    let client = ApiClient::new(&backend.base_url(), test_session());
    let err = client.get::<Value>("/products/missing").await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains("product not found"));
}

#[tokio::test]
async fn test_error_without_body_gets_fallback_message() {
    let router = Router::new().route(
        "/broken",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    );
    let backend = StubBackend::spawn(router).await;

    let client = ApiClient::new(&backend.base_url(), test_session());
    let err = client.get::<Value>("/broken").await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("request failed with status 500"));
}

#[tokio::test]
async fn test_bearer_header_sent_when_token_present() {
    let router = Router::new().route(
        "/whoami",
        get(|headers: axum::http::HeaderMap| async move {
            let token = vendora_integration_tests::bearer_token(&headers);
            Json(json!({ "token": token }))
        }),
    );
    let backend = StubBackend::spawn(router).await;

    let session = test_session();
    session.set_tokens("tok-123", None);
    let client = ApiClient::new(&backend.base_url(), session);

    let value: Value = client.get("/whoami").await.unwrap();
    assert_eq!(value["token"], json!("tok-123"));
}
