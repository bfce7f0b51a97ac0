//! Responses for a model or a page of models, with the standard resource links attached.

use super::{CollectionMetadata, CollectionResponse, LinkErrors, ResponseError, SingleResponse};
use crate::extractors::RequestContext;
use crate::model::{identifier, Model};
use crate::routes::RouteTable;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Role a named route plays for a resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// GET on the collection.
    Collection,
    Get,
    Post,
    Patch,
    Delete,
}

/// Route name per role. Roles without an entry get no link.
pub type RouteNames = HashMap<RouteKind, String>;

/// A response together with every link that could not be built. The response is usable either way.
pub struct LinkedResponse<R> {
    pub response: R,
    pub link_errors: Vec<String>,
}

impl<R> LinkedResponse<R> {
    pub fn error(&self) -> Option<ResponseError> {
        if self.link_errors.is_empty() {
            None
        } else {
            Some(ResponseError::Links(LinkErrors(self.link_errors.clone())))
        }
    }

    pub fn into_result(self) -> Result<R, ResponseError> {
        match self.error() {
            Some(e) => Err(e),
            None => Ok(self.response),
        }
    }

    /// The response, logging any link failures instead of returning them.
    pub fn into_response_logged(self) -> R {
        if let Some(e) = self.error() {
            tracing::warn!(error = %e, "response links incomplete");
        }
        self.response
    }
}

fn collect(errors: &mut Vec<String>, result: Result<(), ResponseError>) {
    if let Err(e) = result {
        errors.push(e.to_string());
    }
}

/// Single response with parent, self, update and delete links for whichever routes are named.
/// Route params are the request's path params plus `id` from the model.
pub fn new_model_single_response<M: Model>(
    model: M,
    route_names: &RouteNames,
    resource_type: &str,
    routes: Arc<RouteTable>,
    request: &RequestContext,
) -> Result<LinkedResponse<SingleResponse<M>>, ResponseError> {
    let mut params = request.path_params.clone();
    if let Some(id) = identifier(&model) {
        params.insert("id".to_string(), id);
    }
    let mut sr = SingleResponse::create(model, resource_type, routes, request.clone())?;
    let mut errors = Vec::new();
    let links = [
        (RouteKind::Collection, "GET", "parent"),
        (RouteKind::Get, "GET", "self"),
        (RouteKind::Patch, "PATCH", "update"),
        (RouteKind::Delete, "DELETE", "delete"),
    ];
    for (kind, method, rel) in links {
        if let Some(name) = route_names.get(&kind) {
            collect(&mut errors, sr.add_link(method, rel, name, &params));
        }
    }
    Ok(LinkedResponse {
        response: sr,
        link_errors: errors,
    })
}

/// Collection response with self, first and last links on the collection route, then create.
pub fn new_model_collection_response<T: Serialize>(
    metadata: CollectionMetadata,
    route_names: &RouteNames,
    resource_type: &str,
    routes: Arc<RouteTable>,
    request: &RequestContext,
) -> Result<LinkedResponse<CollectionResponse<T>>, ResponseError> {
    let params = &request.path_params;
    let mut cr = CollectionResponse::create(metadata, resource_type, routes, request.clone())?;
    let mut errors = Vec::new();
    if let Some(name) = route_names.get(&RouteKind::Collection) {
        for rel in ["self", "first", "last"] {
            collect(&mut errors, cr.add_link("GET", rel, name, params));
        }
    }
    if let Some(name) = route_names.get(&RouteKind::Post) {
        collect(&mut errors, cr.add_link("POST", "create", name, params));
    }
    Ok(LinkedResponse {
        response: cr,
        link_errors: errors,
    })
}
