//! REST service SDK: descriptor-driven persistence, query-string filtering, pagination and
//! hyperlinked JSON responses for axum + PostgreSQL services.

pub mod case;
pub mod config;
pub mod error;
pub mod extractors;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod pagination;
pub mod repository;
pub mod response;
pub mod routes;
pub mod sql;
pub mod state;
pub mod store;
pub mod types;
pub mod validation;

#[cfg(test)]
mod fixtures;

pub use config::ServiceConfig;
pub use error::{AppError, ConfigError, ErrorBody};
pub use extractors::RequestContext;
pub use filter::{parse_query_params, FindBy, QueryParamError};
pub use model::{new_id, FieldDescriptor, FieldKind, Model, Tag};
pub use pagination::{PageError, Pagination};
pub use repository::{PgRepository, Repository, RepositoryError};
pub use response::{
    new_model_collection_response, new_model_single_response, CollectionMetadata, CollectionPaging,
    CollectionResponse, Link, LinkedResponse, ResponseError, RouteKind, RouteNames, SingleResponse,
};
pub use routes::{common_routes, register_resource, resource_routes, RouteTable};
pub use state::ResourceState;
pub use store::{connect, ensure_database_exists};
pub use validation::{RequestDecoder, RuleValidator, ValidationError, Validator};
