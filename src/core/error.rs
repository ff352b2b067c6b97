//! Error types for the proxy
//!
//! Every failure a handler can produce maps onto one wire envelope,
//! `{error, detail?}`, so the front-end sees a single error-body
//! schema across both endpoints. Upstream rejections keep their
//! original status code; transport failures are logged server-side
//! and reported generically.

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Failures terminal to a single proxy request
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Upstream credential is not configured")]
    MissingCredential,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Upstream rejected the request (status {status})")]
    UpstreamRejection { status: u16, detail: String },

    #[error("Transport failure: {0}")]
    Transport(String),
}

/// Wire shape of every error response
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            ProxyError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".to_string(),
                None,
            ),
            // The wire message stays generic; the handler that hit
            // this has already logged which credential is absent.
            ProxyError::MissingCredential => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server configuration error".to_string(),
                None,
            ),
            ProxyError::InvalidRequest(message) => (StatusCode::BAD_REQUEST, message, None),
            ProxyError::UpstreamRejection { status, detail } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                "Upstream error".to_string(),
                Some(detail),
            ),
            ProxyError::Transport(reason) => {
                error!("Upstream transport failure: {}", reason);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server error".to_string(),
                    None,
                )
            }
        };

        let mut response = (
            status,
            Json(ErrorEnvelope {
                error: message,
                detail,
            }),
        )
            .into_response();

        if status == StatusCode::METHOD_NOT_ALLOWED {
            response
                .headers_mut()
                .insert(header::ALLOW, HeaderValue::from_static("POST"));
        }

        response
    }
}
