//! Hypermedia response envelopes: a model or a page of models plus links resolved from the route table.

mod links;
mod model;

pub use links::{Link, ResourceLinks};
pub use model::{new_model_collection_response, new_model_single_response, LinkedResponse, RouteKind, RouteNames};

use crate::extractors::RequestContext;
use crate::filter::FindBy;
use crate::pagination::{PageError, Pagination};
use crate::routes::{RouteError, RouteTable};
use crate::validation::ERROR_DELIMITER;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Every link failure from one response build, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkErrors(pub Vec<String>);

impl fmt::Display for LinkErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(ERROR_DELIMITER))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    #[error("resource type cannot be empty")]
    EmptyResourceType,
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error("{0}")]
    Links(LinkErrors),
}

/// One model under its resource type.
pub struct SingleResponse<T> {
    resource_type: String,
    model: T,
    links: ResourceLinks,
}

impl<T: Serialize> SingleResponse<T> {
    pub fn create(
        model: T,
        resource_type: &str,
        routes: Arc<RouteTable>,
        request: RequestContext,
    ) -> Result<Self, ResponseError> {
        if resource_type.is_empty() {
            return Err(ResponseError::EmptyResourceType);
        }
        Ok(SingleResponse {
            resource_type: resource_type.to_string(),
            model,
            links: ResourceLinks::new(routes, request),
        })
    }

    pub fn add_link(
        &mut self,
        method: &str,
        rel: &str,
        route_name: &str,
        params: &HashMap<String, String>,
    ) -> Result<(), ResponseError> {
        self.links.add_link(method, rel, route_name, params)
    }

    pub fn links(&self) -> &[Link] {
        self.links.links()
    }

    pub fn model(&self) -> &T {
        &self.model
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }
}

impl<T: Serialize> Serialize for SingleResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let links = self.links.links();
        let mut map = serializer.serialize_map(Some(if links.is_empty() { 1 } else { 2 }))?;
        map.serialize_entry(&self.resource_type, &self.model)?;
        if !links.is_empty() {
            map.serialize_entry("links", links)?;
        }
        map.end()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionPaging {
    pub current: u64,
    pub size: u64,
    pub pages: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectionMetadata {
    pub count: u64,
    pub paging: CollectionPaging,
    pub sort: BTreeMap<String, Value>,
    pub filter: BTreeMap<String, Value>,
}

impl CollectionMetadata {
    /// Metadata for one page of a filtered listing. Fails when the requested page is out of range.
    pub fn new(count: u64, pagination: &Pagination, find_by: &FindBy) -> Result<Self, PageError> {
        Ok(CollectionMetadata {
            count,
            paging: CollectionPaging {
                current: pagination.current_page(count)?,
                size: pagination.size(),
                pages: pagination.total_pages(count),
            },
            sort: find_by
                .order_by
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect(),
            filter: find_by.filters(),
        })
    }
}

/// A page of single responses with collection metadata.
pub struct CollectionResponse<T> {
    metadata: CollectionMetadata,
    items: Vec<SingleResponse<T>>,
    links: ResourceLinks,
}

impl<T: Serialize> CollectionResponse<T> {
    pub fn create(
        metadata: CollectionMetadata,
        resource_type: &str,
        routes: Arc<RouteTable>,
        request: RequestContext,
    ) -> Result<Self, ResponseError> {
        if resource_type.is_empty() {
            return Err(ResponseError::EmptyResourceType);
        }
        Ok(CollectionResponse {
            metadata,
            items: Vec::new(),
            links: ResourceLinks::new(routes, request),
        })
    }

    pub fn add_item(&mut self, item: SingleResponse<T>) {
        self.items.push(item);
    }

    pub fn add_link(
        &mut self,
        method: &str,
        rel: &str,
        route_name: &str,
        params: &HashMap<String, String>,
    ) -> Result<(), ResponseError> {
        self.links.add_link(method, rel, route_name, params)
    }

    pub fn items(&self) -> &[SingleResponse<T>] {
        &self.items
    }

    pub fn metadata(&self) -> &CollectionMetadata {
        &self.metadata
    }

    pub fn links(&self) -> &[Link] {
        self.links.links()
    }
}

impl<T: Serialize> Serialize for CollectionResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let links = self.links.links();
        let mut map = serializer.serialize_map(Some(if links.is_empty() { 2 } else { 3 }))?;
        map.serialize_entry("items", &self.items)?;
        map.serialize_entry("metadata", &self.metadata)?;
        if !links.is_empty() {
            map.serialize_entry("links", links)?;
        }
        map.end()
    }
}
