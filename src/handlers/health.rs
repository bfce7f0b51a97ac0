//! Health check endpoint. The check runs once, when the handler is built.

use crate::config::ServiceConfig;
use axum::{
    http::StatusCode,
    routing::{get, MethodRouter},
    Json,
};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt::Display;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    pub service_id: String,
    pub version: String,
    pub release_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    pub fn new<E: Display>(
        result: Result<(), E>,
        service_id: &str,
        version: impl Into<String>,
        release_id: impl Into<String>,
    ) -> Self {
        let (status, error) = match result {
            Ok(()) => ("pass", None),
            Err(e) => ("fail", Some(e.to_string())),
        };
        HealthReport {
            status: status.to_string(),
            service_id: service_id.to_string(),
            version: version.into(),
            release_id: release_id.into(),
            error,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        if self.error.is_some() {
            StatusCode::SERVICE_UNAVAILABLE
        } else {
            StatusCode::OK
        }
    }
}

/// GET handler reporting the boot check result under the configured name, version and release.
pub fn health_check_handler<S, E, F>(check: F, config: &ServiceConfig) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
    E: Display,
    F: FnOnce() -> Result<(), E>,
{
    let report = HealthReport::new(
        check(),
        &config.service_name,
        config.api_version.clone(),
        config.release_tag.clone(),
    );
    health_report_handler(report)
}

/// GET handler serving a fixed report.
pub fn health_report_handler<S>(report: HealthReport) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    let code = report.status_code();
    get(move || {
        let report = report.clone();
        async move { (code, Json(report)) }
    })
}

/// For services that fail hard at startup: reaching the router means boot succeeded.
pub fn successful_boot_check() -> Result<(), Infallible> {
    Ok(())
}
