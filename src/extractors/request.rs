//! The parts of the current request that link generation needs.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Path},
    http::{header::HOST, request::Parts, Uri},
};
use std::collections::HashMap;
use std::convert::Infallible;

#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    /// `Host` header, or the URI authority when the header is absent.
    pub host: String,
    /// Scheme of the request URI, if it carried one.
    pub scheme: Option<String>,
    /// Matched path parameters (`:id` etc.).
    pub path_params: HashMap<String, String>,
    pub uri: Uri,
}

impl RequestContext {
    pub fn new(host: impl Into<String>, uri: Uri) -> Self {
        RequestContext {
            host: host.into(),
            scheme: uri.scheme_str().map(str::to_string),
            path_params: HashMap::new(),
            uri,
        }
    }

    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Request scheme, `http` when unset.
    pub fn scheme(&self) -> &str {
        self.scheme.as_deref().unwrap_or("http")
    }

    /// Absolute URL for a path on the current host.
    pub fn absolute(&self, path: &str) -> String {
        format!("{}://{}{}", self.scheme(), self.host, path)
    }

    /// Path and query as received, for the filter parser.
    pub fn path_and_query(&self) -> &str {
        self.uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/")
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let host = parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| parts.uri.authority().map(|a| a.to_string()))
            .unwrap_or_default();
        let path_params = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map(|Path(p)| p)
            .unwrap_or_default();
        Ok(RequestContext {
            host,
            scheme: parts.uri.scheme_str().map(str::to_string),
            path_params,
            uri: parts.uri.clone(),
        })
    }
}
