//! Structured filter requests built from query strings and consumed by the repository.

mod query_params;

pub use query_params::{parse_query_params, QueryParamError};

use crate::model::FieldKind;
use crate::pagination::Pagination;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Exact-match conditions, substring search and ordering keyed by wire field name, plus paging.
/// A field must not be in both `conditions` and `search`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FindBy {
    pub conditions: BTreeMap<String, Value>,
    pub search: BTreeMap<String, Value>,
    pub order_by: BTreeMap<String, String>,
    pub limit: u64,
    pub offset: u64,
}

impl FindBy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn condition(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.insert(field.into(), value.into());
        self
    }

    pub fn search(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.search.insert(field.into(), value.into());
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: impl Into<String>) -> Self {
        self.order_by.insert(field.into(), direction.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Apply page size and offset from the request's pagination parameters.
    pub fn paginate(mut self, pagination: &Pagination) -> Self {
        self.limit = pagination.size();
        self.offset = pagination.offset();
        self
    }

    /// Conditions and search terms merged, as echoed back in collection metadata.
    pub fn filters(&self) -> BTreeMap<String, Value> {
        let mut out = self.conditions.clone();
        out.extend(self.search.iter().map(|(k, v)| (k.clone(), v.clone())));
        out
    }
}

/// Typed JSON value for a raw query-string value, so booleans and numbers bind as such.
pub fn value_for_kind(kind: FieldKind, s: &str) -> Value {
    match kind {
        FieldKind::Boolean => {
            if s.eq_ignore_ascii_case("true") {
                return Value::Bool(true);
            }
            if s.eq_ignore_ascii_case("false") {
                return Value::Bool(false);
            }
        }
        FieldKind::Number => {
            if let Ok(n) = s.parse::<i64>() {
                return Value::Number(n.into());
            }
            if let Some(n) = s.parse::<f64>().ok().and_then(serde_json::Number::from_f64) {
                return Value::Number(n);
            }
        }
        _ => {}
    }
    Value::String(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_and_filters() {
        let fb = FindBy::new()
            .condition("name", "a")
            .search("password", "b")
            .order_by("name", "desc")
            .limit(5)
            .offset(10);
        assert_eq!(fb.limit, 5);
        assert_eq!(fb.offset, 10);
        let filters = fb.filters();
        assert_eq!(filters.get("name"), Some(&json!("a")));
        assert_eq!(filters.get("password"), Some(&json!("b")));
    }

    #[test]
    fn values_follow_field_kind() {
        assert_eq!(value_for_kind(FieldKind::Boolean, "TRUE"), json!(true));
        assert_eq!(value_for_kind(FieldKind::Boolean, "maybe"), json!("maybe"));
        assert_eq!(value_for_kind(FieldKind::Number, "42"), json!(42));
        assert_eq!(value_for_kind(FieldKind::Number, "4.5"), json!(4.5));
        assert_eq!(value_for_kind(FieldKind::Text, "42"), json!("42"));
    }
}
