use super::CLIENT_ID_HEADER;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

/// Name reported in every API call event.
#[derive(Clone, Debug)]
pub struct RequestLogger {
    pub service_name: Arc<str>,
}

impl RequestLogger {
    pub fn new(service_name: impl AsRef<str>) -> Self {
        RequestLogger {
            service_name: Arc::from(service_name.as_ref()),
        }
    }
}

/// One `info` event per request with method, url, client id, status and duration.
pub async fn request_logger(State(logger): State<RequestLogger>, req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let url = req.uri().to_string();
    let client_id = req
        .headers()
        .get(CLIENT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let response = next.run(req).await;

    tracing::info!(
        service = %logger.service_name,
        method = %method,
        url = %url,
        client_id = %client_id,
        status = response.status().as_u16(),
        duration_ms = started.elapsed().as_millis() as u64,
        "{} API Call",
        logger.service_name
    );
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware::from_fn_with_state, routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn passes_response_through() {
        let app = Router::new()
            .route("/", get(|| async { (StatusCode::ACCEPTED, "done") }))
            .layer(from_fn_with_state(RequestLogger::new("widgets"), request_logger));
        let res = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::ACCEPTED);
    }
}
