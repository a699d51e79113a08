//! Per-request correlation IDs.
//!
//! Every request gets an `x-request-id`: the upstream proxy's value when one
//! arrives, a fresh UUID v4 otherwise. The ID is recorded on the tracing
//! span, tagged onto the Sentry scope, and echoed in the response so a
//! client-reported failure can be matched to server logs.

use axum::extract::Request;
use axum::http::{HeaderValue, header::HeaderName};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Span;
use uuid::Uuid;

/// Header carrying the correlation ID.
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

fn incoming_id(request: &Request) -> Option<String> {
    let value = request.headers().get(&REQUEST_ID_HEADER)?.to_str().ok()?;
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

/// Middleware that assigns (or propagates) the request's correlation ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id =
        incoming_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
