//! Shared state for one resource's routes.

use crate::error::ConfigError;
use crate::model::Model;
use crate::repository::Repository;
use crate::response::RouteNames;
use crate::routes::RouteTable;
use crate::validation::{RequestDecoder, RuleValidator, Validator};
use std::sync::Arc;

pub struct ResourceState<M: Model> {
    pub repository: Arc<dyn Repository<M>>,
    pub routes: Arc<RouteTable>,
    pub route_names: Arc<RouteNames>,
    pub validator: Arc<dyn Validator>,
    /// Key a single model is served under, e.g. `widget`.
    pub resource_type: Arc<str>,
    /// Resource type of the collection, e.g. `widgets`.
    pub collection_type: Arc<str>,
    pub create_decoder: Arc<RequestDecoder<M>>,
    pub update_decoder: Arc<RequestDecoder<M>>,
}

impl<M: Model> Clone for ResourceState<M> {
    fn clone(&self) -> Self {
        ResourceState {
            repository: Arc::clone(&self.repository),
            routes: Arc::clone(&self.routes),
            route_names: Arc::clone(&self.route_names),
            validator: Arc::clone(&self.validator),
            resource_type: Arc::clone(&self.resource_type),
            collection_type: Arc::clone(&self.collection_type),
            create_decoder: Arc::clone(&self.create_decoder),
            update_decoder: Arc::clone(&self.update_decoder),
        }
    }
}

impl<M: Model> ResourceState<M> {
    /// State with the default validator and decoders that accept every field.
    pub fn new(
        repository: Arc<dyn Repository<M>>,
        routes: Arc<RouteTable>,
        route_names: RouteNames,
        resource_type: &str,
        collection_type: &str,
    ) -> Result<Self, ConfigError> {
        Ok(ResourceState {
            repository,
            routes,
            route_names: Arc::new(route_names),
            validator: Arc::new(RuleValidator::new()),
            resource_type: Arc::from(resource_type),
            collection_type: Arc::from(collection_type),
            create_decoder: Arc::new(RequestDecoder::new(&[])?),
            update_decoder: Arc::new(RequestDecoder::new(&[])?),
        })
    }

    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = validator;
        self
    }

    /// Restrict which fields a create body may set (Rust field names).
    pub fn with_create_fields(mut self, fields: &[&str]) -> Result<Self, ConfigError> {
        self.create_decoder = Arc::new(RequestDecoder::new(fields)?);
        Ok(self)
    }

    /// Restrict which fields an update body may set (Rust field names).
    pub fn with_update_fields(mut self, fields: &[&str]) -> Result<Self, ConfigError> {
        self.update_decoder = Arc::new(RequestDecoder::new(fields)?);
        Ok(self)
    }
}
