//! Model field descriptors: the static table every record type declares instead of struct tags.
//! Wire names are what clients see in JSON and query strings; column names are what PostgreSQL stores.

mod tags;

pub use tags::*;

use serde::{de::DeserializeOwned, Serialize};

/// Semantic type of a field. Drives filter eligibility and how values are bound in SQL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Uuid,
    Datetime,
    Date,
    Boolean,
    Text,
    Number,
    Json,
}

impl FieldKind {
    /// PostgreSQL cast applied to bound parameters, which are always sent as text.
    pub fn pg_cast(&self) -> Option<&'static str> {
        match self {
            FieldKind::Uuid => Some("uuid"),
            FieldKind::Datetime => Some("timestamptz"),
            FieldKind::Date => Some("date"),
            FieldKind::Boolean => Some("boolean"),
            FieldKind::Number => Some("numeric"),
            FieldKind::Json => Some("jsonb"),
            FieldKind::Text => None,
        }
    }
}

/// Which descriptor value to read when building a mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tag {
    /// Rust field name.
    Field,
    /// External (JSON / query string) name.
    Wire,
    /// Storage column name.
    Column,
}

/// Marker that excludes a field from a mapping, like `json:"-"`.
pub const SKIP: &str = "-";

#[derive(Clone, Copy, Debug)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub wire: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
    /// Comma separated validation rules, e.g. `"uuid4"` or `"min=3,max=63"`.
    pub rules: &'static str,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, wire: &'static str, column: &'static str) -> Self {
        FieldDescriptor {
            name,
            wire,
            column,
            kind: FieldKind::Text,
            rules: "",
        }
    }

    pub const fn kind(self, kind: FieldKind) -> Self {
        FieldDescriptor { kind, ..self }
    }

    pub const fn rules(self, rules: &'static str) -> Self {
        FieldDescriptor { rules, ..self }
    }

    pub fn tag(&self, tag: Tag) -> &'static str {
        match tag {
            Tag::Field => self.name,
            Tag::Wire => self.wire,
            Tag::Column => self.column,
        }
    }
}

/// Fresh identifier: a lowercase UUID v4 string.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A persisted record type. Serialization must use the wire names declared in `fields()`.
pub trait Model: Serialize + DeserializeOwned + Send + Sync + Unpin + 'static {
    /// Column matched by find/update/delete.
    const ID_COLUMN: &'static str = "id";

    fn fields() -> &'static [FieldDescriptor];

    /// Descriptor by wire name.
    fn field(wire: &str) -> Option<&'static FieldDescriptor> {
        Self::fields().iter().find(|f| f.wire == wire)
    }
}
