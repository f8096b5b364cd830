// src/logging_middleware.rs
//! Middleware for logging request and response bodies in debug mode

use axum::body::to_bytes;
use axum::{
    body::Body,
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Middleware to log request and response bodies in debug mode.
/// Multipart uploads are passed through untouched; buffering a spreadsheet
/// or resume just to log it would be wasted work.
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/"))
        .unwrap_or(false);

    let request = if is_multipart {
        debug!(method = %request.method(), uri = %request.uri(), "📥 Request (multipart body omitted)");
        request
    } else {
        let (parts, body) = request.into_parts();

        let bytes = to_bytes(body, usize::MAX)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        if !bytes.is_empty() {
            if let Ok(body_str) = std::str::from_utf8(&bytes) {
                // Try to parse as JSON for pretty printing
                if let Ok(json) = serde_json::from_str::<serde_json::Value>(body_str) {
                    debug!(
                        method = %parts.method,
                        uri = %parts.uri,
                        request_body = %serde_json::to_string_pretty(&json).unwrap_or_else(|_| body_str.to_string()),
                        "📥 Request"
                    );
                } else {
                    debug!(
                        method = %parts.method,
                        uri = %parts.uri,
                        request_body = %body_str,
                        "📥 Request"
                    );
                }
            }
        }

        Request::from_parts(parts, Body::from(bytes))
    };

    let response = next.run(request).await;

    let (parts, body) = response.into_parts();

    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !bytes.is_empty() {
        if let Ok(body_str) = std::str::from_utf8(&bytes) {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(body_str) {
                debug!(
                    status = %parts.status,
                    response_body = %serde_json::to_string_pretty(&json).unwrap_or_else(|_| body_str.to_string()),
                    "📤 Response"
                );
            } else {
                debug!(
                    status = %parts.status,
                    response_body = %body_str,
                    "📤 Response"
                );
            }
        }
    }

    let response = Response::from_parts(parts, Body::from(bytes));

    Ok(response)
}
