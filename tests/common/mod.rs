use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use rest_service_sdk::{
    model::{identifier, values_by_tag},
    register_resource, resource_routes, sql, FieldDescriptor, FieldKind, FindBy, Model, Repository,
    RepositoryError, ResourceState, RouteTable, Tag,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::{Arc, Mutex};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub show_product: bool,
}

const WIDGET_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", "id", "id").kind(FieldKind::Uuid).rules("uuid4"),
    FieldDescriptor::new("name", "name", "name").rules("required,min=3,max=63"),
    FieldDescriptor::new("show_product", "showProduct", "show_product").kind(FieldKind::Boolean),
];

impl Model for Widget {
    fn fields() -> &'static [FieldDescriptor] {
        WIDGET_FIELDS
    }
}

pub fn widget(id: &str, name: &str, show_product: bool) -> Widget {
    Widget {
        id: id.to_string(),
        name: Some(name.to_string()),
        show_product,
    }
}

/// Vec-backed repository applying `FindBy` the way the SQL builder does.
#[derive(Default)]
pub struct MemoryRepository {
    pub rows: Mutex<Vec<Widget>>,
}

impl MemoryRepository {
    pub fn with_rows(rows: Vec<Widget>) -> Self {
        MemoryRepository {
            rows: Mutex::new(rows),
        }
    }

    fn matching(&self, fb: &FindBy) -> Result<Vec<Widget>, RepositoryError> {
        // Same up-front checks as the SQL path.
        sql::select_filtered::<Widget>("widgets", fb, true, true)?;
        let text = |v: &Value| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let rows = self.rows.lock().unwrap();
        let mut out = Vec::new();
        for row in rows.iter() {
            let values = values_by_tag(row, Tag::Wire)?;
            let get = |k: &str| values.get(k).cloned().unwrap_or(Value::Null);
            let conditions = fb.conditions.iter().all(|(k, v)| text(&get(k)) == text(v));
            let search = fb.search.iter().all(|(k, v)| text(&get(k)).contains(&text(v)));
            if conditions && search {
                out.push(row.clone());
            }
        }
        Ok(out)
    }
}

#[async_trait]
impl Repository<Widget> for MemoryRepository {
    async fn find(&self, id: &str) -> Result<Option<Widget>, RepositoryError> {
        Ok(self.rows.lock().unwrap().iter().find(|w| w.id == id).cloned())
    }

    async fn find_one_by(&self, find_by: &FindBy) -> Result<Option<Widget>, RepositoryError> {
        Ok(self.matching(find_by)?.into_iter().next())
    }

    async fn find_by(&self, find_by: &FindBy) -> Result<Vec<Widget>, RepositoryError> {
        let rows = self.matching(find_by)?;
        let skip = find_by.offset as usize;
        let take = if find_by.limit == 0 { usize::MAX } else { find_by.limit as usize };
        Ok(rows.into_iter().skip(skip).take(take).collect())
    }

    async fn create(&self, record: &Widget) -> Result<(), RepositoryError> {
        self.rows.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn update(&self, record: &Widget) -> Result<(), RepositoryError> {
        let id = identifier(record).ok_or(RepositoryError::MissingIdentifier)?;
        let mut rows = self.rows.lock().unwrap();
        if let Some(row) = rows.iter_mut().find(|w| w.id == id) {
            *row = record.clone();
        }
        Ok(())
    }

    async fn delete(&self, record: &Widget) -> Result<(), RepositoryError> {
        self.rows.lock().unwrap().retain(|w| w.id != record.id);
        Ok(())
    }

    async fn count(&self, find_by: &FindBy) -> Result<i64, RepositoryError> {
        Ok(self.matching(find_by)?.len() as i64)
    }
}

pub const ID_1: &str = "c24b2909-92e3-4266-ac13-95ac9f24388f";
pub const ID_2: &str = "5f0e6a1c-2a8b-4c1d-9e3f-7a6b5c4d3e2f";

pub fn app(repo: Arc<MemoryRepository>) -> Router {
    let mut routes = RouteTable::new();
    let names = register_resource(&mut routes, "widgets", "/widgets");
    let state = ResourceState::<Widget>::new(repo, Arc::new(routes), names, "widget", "widgets")
        .unwrap()
        .with_create_fields(&["name", "show_product"])
        .unwrap()
        .with_update_fields(&["name", "show_product"])
        .unwrap();
    resource_routes("/widgets", state)
}

pub fn seeded() -> Arc<MemoryRepository> {
    Arc::new(MemoryRepository::with_rows(vec![
        widget(ID_1, "sprocket", true),
        widget(ID_2, "gear", false),
    ]))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).header("host", "api.test").body(Body::empty()).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("host", "api.test")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(res: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
