//! Shared test model.

use crate::model::{FieldDescriptor, FieldKind, Model};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
    pub id: String,
    pub name: Option<String>,
    pub password: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub show_product: bool,
    #[serde(default)]
    pub computed: Option<String>,
}

const WIDGET_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", "id", "id")
        .kind(FieldKind::Uuid)
        .rules("uuid4"),
    FieldDescriptor::new("name", "name", "name").rules("min=3,max=63"),
    FieldDescriptor::new("password", "password", "password"),
    FieldDescriptor::new("created_at", "createdAt", "created_at").kind(FieldKind::Datetime),
    FieldDescriptor::new("show_product", "showProduct", "show_product").kind(FieldKind::Boolean),
    FieldDescriptor::new("computed", "computed", "-"),
];

impl Model for Widget {
    fn fields() -> &'static [FieldDescriptor] {
        WIDGET_FIELDS
    }
}

impl Widget {
    pub fn sample() -> Self {
        Widget {
            id: "c24b2909-92e3-4266-ac13-95ac9f24388f".into(),
            name: Some("sprocket".into()),
            password: None,
            created_at: Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).single(),
            show_product: true,
            computed: Some("derived".into()),
        }
    }
}
