//! Router fallbacks that answer with the error envelope.

use crate::error::error_response;
use axum::{
    http::{Method, StatusCode, Uri},
    response::Response,
};

/// 404 for any unmatched route: `No route found for "GET /path?query"`.
pub async fn not_found(method: Method, uri: Uri) -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        format!("No route found for \"{} {}\"", method, uri),
    )
}

pub async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}
