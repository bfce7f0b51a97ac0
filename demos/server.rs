//! Example server: one `widgets` resource over PostgreSQL with the standard middleware stack.
//!
//! Expects a table like:
//! `CREATE TABLE widgets (id uuid PRIMARY KEY, name text, show_product boolean NOT NULL, created_at timestamptz)`.

use axum::{
    extract::Request,
    middleware::{from_fn, from_fn_with_state},
    Router, ServiceExt,
};
use rest_service_sdk::{
    common_routes, connect, ensure_database_exists,
    handlers::{not_found, successful_boot_check},
    middleware::{self, RequestLogger, ServiceToken},
    register_resource, resource_routes,
    types::NullDatetime,
    FieldDescriptor, FieldKind, Model, PgRepository, ResourceState, RouteTable, ServiceConfig,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Widget {
    id: String,
    name: Option<String>,
    #[serde(default)]
    show_product: bool,
    #[serde(default)]
    created_at: NullDatetime,
}

const WIDGET_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", "id", "id").kind(FieldKind::Uuid).rules("uuid4"),
    FieldDescriptor::new("name", "name", "name").rules("required,min=3,max=63"),
    FieldDescriptor::new("show_product", "showProduct", "show_product").kind(FieldKind::Boolean),
    FieldDescriptor::new("created_at", "createdAt", "created_at").kind(FieldKind::Datetime),
];

impl Model for Widget {
    fn fields() -> &'static [FieldDescriptor] {
        WIDGET_FIELDS
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rest_service_sdk=info".parse()?))
        .init();

    let config = ServiceConfig::from_env()?;
    ensure_database_exists(&config.database_url).await?;
    let pool = connect(&config.database_url, 5).await?;

    let mut routes = RouteTable::new();
    let names = register_resource(&mut routes, "widgets", "/widgets");
    let state = ResourceState::<Widget>::new(
        Arc::new(PgRepository::new(pool, "widgets")),
        Arc::new(routes),
        names,
        "widget",
        "widgets",
    )?
    .with_create_fields(&["name", "show_product", "created_at"])?
    .with_update_fields(&["name", "show_product"])?;

    let mut api = resource_routes("/widgets", state)
        .layer(from_fn(middleware::client_id))
        .layer(from_fn(middleware::json_content_type));
    if let Some(token) = &config.service_token {
        api = api.layer(from_fn_with_state(ServiceToken::new(token), middleware::token));
    }

    let app = Router::new()
        .merge(common_routes(&config, successful_boot_check))
        .merge(api)
        .fallback(not_found)
        .layer(from_fn_with_state(
            RequestLogger::new(&config.service_name),
            middleware::request_logger,
        ))
        .layer(RequestBodyLimitLayer::new(1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::recover());
    let app = from_fn(middleware::method_override).layer(app);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;
    Ok(())
}
