//! Common routes: health and version.

use crate::config::ServiceConfig;
use crate::handlers::health_check_handler;
use axum::{routing::get, Json, Router};
use std::fmt::Display;

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// GET /health reporting `boot_check` (run once, now) and GET /version.
pub fn common_routes<E: Display>(config: &ServiceConfig, boot_check: impl FnOnce() -> Result<(), E>) -> Router {
    Router::new()
        .route("/health", health_check_handler(boot_check, config))
        .route("/version", get(version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::successful_boot_check;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    fn config() -> ServiceConfig {
        ServiceConfig::from_lookup(|key| match key {
            "SERVICE_NAME" => Some("widgets".into()),
            "API_VERSION" => Some("1.2".into()),
            "RELEASE_TAG" => Some("r9".into()),
            _ => None,
        })
        .unwrap()
    }

    async fn health(router: Router) -> (StatusCode, serde_json::Value) {
        let res = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_configured_version_and_release() {
        let (status, body) = health(common_routes(&config(), successful_boot_check)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            serde_json::json!({"status": "pass", "serviceId": "widgets", "version": "1.2", "releaseId": "r9"})
        );
    }

    #[tokio::test]
    async fn failed_boot_check_is_503() {
        let (status, body) = health(common_routes(&config(), || Err("db down"))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "db down");
    }
}
