//! Named routes. axum does not name its routes, so link generation resolves names through this table.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Route {0} does not exist")]
    UnknownRoute(String),
    #[error("route {route}: missing parameter '{param}'")]
    MissingParam { route: String, param: String },
}

/// Route name -> axum path template (`/widgets/:id`).
#[derive(Clone, Debug, Default)]
pub struct RouteTable {
    routes: HashMap<String, String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_route(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.insert(name, template);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, template: impl Into<String>) {
        self.routes.insert(name.into(), template.into());
    }

    pub fn template(&self, name: &str) -> Option<&str> {
        self.routes.get(name).map(String::as_str)
    }

    /// Expand the named route's `:param` and `*param` segments, percent-encoding the values.
    /// A `*param` value keeps its `/` separators. Extra params are ignored.
    pub fn url(&self, name: &str, params: &HashMap<String, String>) -> Result<String, RouteError> {
        let template = self
            .template(name)
            .ok_or_else(|| RouteError::UnknownRoute(name.to_string()))?;
        let value = |param: &str| {
            params.get(param).ok_or_else(|| RouteError::MissingParam {
                route: name.to_string(),
                param: param.to_string(),
            })
        };
        let segments = template
            .split('/')
            .map(|segment| {
                if let Some(param) = segment.strip_prefix(':') {
                    value(param).map(|v| encode_segment(v))
                } else if let Some(param) = segment.strip_prefix('*') {
                    value(param).map(|v| v.split('/').map(encode_segment).collect::<Vec<_>>().join("/"))
                } else {
                    Ok(segment.to_string())
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(segments.join("/"))
    }
}

/// Percent-encode one path segment. `byte_serialize` writes spaces as `+` and a literal `+` as
/// `%2B`, so swapping `+` back to `%20` is exact.
fn encode_segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
