//! CRUD routes for one model, plus their entries in the route table.

use crate::handlers::method_not_allowed;
use crate::handlers::resource::{create, delete, list, read, update};
use crate::model::Model;
use crate::response::{RouteKind, RouteNames};
use crate::routes::RouteTable;
use crate::state::ResourceState;
use axum::{routing::get, Router};

/// Name of a resource route: `widgets.list`, `widgets.read`, ...
pub fn route_name(resource: &str, kind: RouteKind) -> String {
    let suffix = match kind {
        RouteKind::Collection => "list",
        RouteKind::Get => "read",
        RouteKind::Post => "create",
        RouteKind::Patch => "update",
        RouteKind::Delete => "delete",
    };
    format!("{}.{}", resource, suffix)
}

fn item_path(collection_path: &str) -> String {
    format!("{}/:id", collection_path.trim_end_matches('/'))
}

/// Add the collection and item routes of `resource` to `table` and return their names by role.
pub fn register_resource(table: &mut RouteTable, resource: &str, collection_path: &str) -> RouteNames {
    let item = item_path(collection_path);
    [
        (RouteKind::Collection, collection_path.to_string()),
        (RouteKind::Post, collection_path.to_string()),
        (RouteKind::Get, item.clone()),
        (RouteKind::Patch, item.clone()),
        (RouteKind::Delete, item),
    ]
    .into_iter()
    .map(|(kind, path)| {
        let name = route_name(resource, kind);
        table.insert(name.clone(), path);
        (kind, name)
    })
    .collect()
}

/// `GET|POST <collection_path>` and `GET|PATCH|PUT|DELETE <collection_path>/:id`.
pub fn resource_routes<M: Model>(collection_path: &str, state: ResourceState<M>) -> Router {
    Router::new()
        .route(
            collection_path,
            get(list::<M>).post(create::<M>).fallback(method_not_allowed),
        )
        .route(
            &item_path(collection_path),
            get(read::<M>)
                .patch(update::<M>)
                .put(update::<M>)
                .delete(delete::<M>)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn registers_five_named_routes() {
        let mut table = RouteTable::new();
        let names = register_resource(&mut table, "widgets", "/shops/:shop/widgets/");
        assert_eq!(names.len(), 5);
        assert_eq!(names[&RouteKind::Get], "widgets.read");
        assert_eq!(table.template("widgets.list"), Some("/shops/:shop/widgets/"));
        let params: HashMap<String, String> =
            [("shop", "s1"), ("id", "9")].iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        assert_eq!(table.url("widgets.delete", &params).unwrap(), "/shops/s1/widgets/9");
    }
}
