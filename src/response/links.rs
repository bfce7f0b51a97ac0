use super::ResponseError;
use crate::extractors::RequestContext;
use crate::routes::RouteTable;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub method: String,
    pub rel: String,
    pub href: String,
}

/// Links of one response, in the order they were added, resolved against the current request.
#[derive(Clone, Debug)]
pub struct ResourceLinks {
    routes: Arc<RouteTable>,
    request: RequestContext,
    links: Vec<Link>,
}

impl ResourceLinks {
    pub fn new(routes: Arc<RouteTable>, request: RequestContext) -> Self {
        ResourceLinks {
            routes,
            request,
            links: Vec::new(),
        }
    }

    /// Resolve `route_name` with `params` into an absolute href on the request's host and append it.
    pub fn add_link(
        &mut self,
        method: &str,
        rel: &str,
        route_name: &str,
        params: &HashMap<String, String>,
    ) -> Result<(), ResponseError> {
        let path = self.routes.url(route_name, params)?;
        self.links.push(Link {
            method: method.to_uppercase(),
            rel: rel.to_lowercase(),
            href: self.request.absolute(&path),
        });
        Ok(())
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn request(&self) -> &RequestContext {
        &self.request
    }
}
