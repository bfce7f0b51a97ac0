//! Service settings from the environment.

use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/rest_service";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Reported by the health check and the request logger.
    pub service_name: String,
    /// Expected `x-ied-service-token`; `None` disables the token check.
    pub service_token: Option<String>,
    pub api_version: String,
    pub release_tag: String,
}

impl ServiceConfig {
    /// Read `DATABASE_URL`, `BIND_ADDR`, `SERVICE_NAME`, `SERVICE_TOKEN`, `API_VERSION`, `RELEASE_TAG`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let bind = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind
            .parse()
            .map_err(|e| ConfigError::Load(format!("BIND_ADDR '{}': {}", bind, e)))?;
        Ok(ServiceConfig {
            database_url: var("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            bind_addr,
            service_name: var("SERVICE_NAME").unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string()),
            service_token: var("SERVICE_TOKEN"),
            api_version: var("API_VERSION").unwrap_or_default(),
            release_tag: var("RELEASE_TAG").unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(pairs: &[(&str, &str)]) -> Result<ServiceConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ServiceConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = from(&[]).unwrap();
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(cfg.bind_addr.port(), 3000);
        assert_eq!(cfg.service_name, "rest-service-sdk");
        assert!(cfg.service_token.is_none());
    }

    #[test]
    fn reads_values() {
        let cfg = from(&[
            ("DATABASE_URL", "postgres://db/widgets"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("SERVICE_NAME", "widgets"),
            ("SERVICE_TOKEN", "t"),
            ("API_VERSION", "2"),
            ("RELEASE_TAG", "r1"),
        ])
        .unwrap();
        assert_eq!(cfg.database_url, "postgres://db/widgets");
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.service_token.as_deref(), Some("t"));
        assert_eq!(cfg.release_tag, "r1");
    }

    #[test]
    fn bad_bind_addr() {
        assert!(matches!(from(&[("BIND_ADDR", "nowhere")]), Err(ConfigError::Load(_))));
    }
}
