//! HTTP middleware for service endpoints. Use with `axum::middleware::from_fn` / `from_fn_with_state`.
//!
//! `method_override` must wrap the whole router (`from_fn(method_override).layer(router)`) because
//! layers added with `Router::layer` run after routing.

mod request_logger;

pub use request_logger::{request_logger, RequestLogger};

use crate::error::error_response;
use axum::{
    extract::{Request, State},
    http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use std::any::Any;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;

pub const CLIENT_ID_HEADER: &str = "x-ied-client-id";
pub const SERVICE_TOKEN_HEADER: &str = "x-ied-service-token";
pub const METHOD_OVERRIDE_HEADER: &str = "X-HTTP-Method-Override";

fn header<'a>(req: &'a Request, name: &str) -> &'a str {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Reject requests without a client id header.
pub async fn client_id(req: Request, next: Next) -> Response {
    if header(&req, CLIENT_ID_HEADER).is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "Bad Request. HTTP Header X-Ied-Client-Id is missing or not a valid UUID format.",
        );
    }
    next.run(req).await
}

/// Accepted request and emitted response content types.
#[derive(Clone, Debug)]
pub struct ContentType {
    pub accept: String,
    pub respond: String,
}

impl ContentType {
    pub fn new(accept: impl Into<String>, respond: impl Into<String>) -> Self {
        ContentType {
            accept: accept.into(),
            respond: respond.into(),
        }
    }

    pub fn json() -> Self {
        Self::new("application/json", "application/json")
    }
}

/// 415 unless the request Content-Type is exactly `accept`; the response Content-Type is always `respond`.
pub async fn content_type(State(ct): State<ContentType>, req: Request, next: Next) -> Response {
    let mut response = if header(&req, CONTENT_TYPE.as_str()) != ct.accept {
        error_response(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("Unsupported Media Type. Expecting {} as Content-Type.", ct.accept),
        )
    } else {
        next.run(req).await
    };
    if let Ok(v) = HeaderValue::from_str(&ct.respond) {
        response.headers_mut().insert(CONTENT_TYPE, v);
    }
    response
}

/// `content_type` fixed to `application/json` both ways.
pub async fn json_content_type(req: Request, next: Next) -> Response {
    content_type(State(ContentType::json()), req, next).await
}

/// A POST carrying `X-HTTP-Method-Override: PUT|PATCH|DELETE` is handled as that method.
pub async fn method_override(mut req: Request, next: Next) -> Response {
    if req.method() == Method::POST {
        let method = match header(&req, METHOD_OVERRIDE_HEADER) {
            "PUT" => Some(Method::PUT),
            "PATCH" => Some(Method::PATCH),
            "DELETE" => Some(Method::DELETE),
            _ => None,
        };
        if let Some(m) = method {
            *req.method_mut() = m;
        }
    }
    next.run(req).await
}

/// Expected service token; requests must present it in `x-ied-service-token`.
#[derive(Clone, Debug)]
pub struct ServiceToken(pub Arc<str>);

impl ServiceToken {
    pub fn new(token: impl AsRef<str>) -> Self {
        ServiceToken(Arc::from(token.as_ref()))
    }
}

pub async fn token(State(expected): State<ServiceToken>, req: Request, next: Next) -> Response {
    if header(&req, SERVICE_TOKEN_HEADER) != &*expected.0 {
        return error_response(StatusCode::UNAUTHORIZED, "Bad Request. Invalid Token in Headers.");
    }
    next.run(req).await
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("handler panicked");
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

pub type RecoverLayer = CatchPanicLayer<fn(Box<dyn Any + Send + 'static>) -> Response>;

/// Turn a panicking handler into a 500 error envelope.
pub fn recover() -> RecoverLayer {
    CatchPanicLayer::custom(panic_response as fn(Box<dyn Any + Send + 'static>) -> Response)
}
