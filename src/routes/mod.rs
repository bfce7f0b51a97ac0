//! Routers and the named route table used for link generation.

mod common;
mod resource;
mod table;

pub use common::common_routes;
pub use resource::{register_resource, resource_routes, route_name};
pub use table::{RouteError, RouteTable};
