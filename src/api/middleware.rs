//! Cross-cutting HTTP policy
//!
//! The front-end is a static site served from a different origin, so
//! every response the proxy produces — success or failure — must
//! carry the permissive CORS header set, and preflight requests must
//! be answered before any routing or validation happens. Centralizing
//! that here means no handler can miss it.

use crate::core::constants::cors;
use axum::extract::Request;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Append the permissive CORS header set to a response.
pub fn apply_cors_headers(response: &mut Response) {
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(cors::ALLOW_ORIGIN),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(cors::ALLOW_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(cors::ALLOW_HEADERS),
    );
}

/// CORS middleware applied over the whole router.
///
/// `OPTIONS` requests short-circuit with `204 No Content` and no body;
/// everything else runs the inner service and leaves with the CORS
/// headers attached, error responses included.
pub async fn cors(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors_headers(&mut response);
        return response;
    }

    let mut response = next.run(request).await;
    apply_cors_headers(&mut response);
    response
}
