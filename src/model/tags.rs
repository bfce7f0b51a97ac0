//! Mappings derived from a model's field descriptors, plus the type-policy lookups used by the filter parser.

use super::{FieldDescriptor, FieldKind, Model, Tag, SKIP};
use crate::case::to_camel_case;
use serde_json::{Map, Value};
use std::collections::HashMap;

fn is_skipped(value: &str) -> bool {
    value.is_empty() || value == SKIP
}

/// Map `key` tag -> `value` tag for every field where both are set and not skipped.
pub fn tag_map<M: Model>(key: Tag, value: Tag) -> HashMap<String, String> {
    descriptor_map(M::fields(), key, value)
}

pub fn descriptor_map(fields: &[FieldDescriptor], key: Tag, value: Tag) -> HashMap<String, String> {
    fields
        .iter()
        .filter(|f| !is_skipped(f.tag(key)) && !is_skipped(f.tag(value)))
        .map(|f| (f.tag(key).to_string(), f.tag(value).to_string()))
        .collect()
}

/// Non-skipped values of one tag in declaration order (e.g. the INSERT column list).
pub fn tag_values<M: Model>(tag: Tag) -> Vec<&'static str> {
    M::fields()
        .iter()
        .map(|f| f.tag(tag))
        .filter(|v| !is_skipped(v))
        .collect()
}

/// Serialize `model` and re-key each field value by `tag`. Fields with an empty tag fall back to
/// the Rust field name; fields whose tag is `-` are left out.
pub fn values_by_tag<M: Model>(model: &M, tag: Tag) -> Result<Map<String, Value>, serde_json::Error> {
    let serialized = match serde_json::to_value(model)? {
        Value::Object(map) => map,
        other => {
            return Err(<serde_json::Error as serde::ser::Error>::custom(format!(
                "model must serialize to a JSON object, got {}",
                other
            )))
        }
    };
    let mut out = Map::new();
    for f in M::fields() {
        let key = f.tag(tag);
        if key == SKIP {
            continue;
        }
        let key = if key.is_empty() { f.name } else { key };
        let value = serialized.get(f.wire).cloned().unwrap_or(Value::Null);
        out.insert(key.to_string(), value);
    }
    Ok(out)
}

/// The model's identifier value as a string, read from the field stored in `M::ID_COLUMN`.
pub fn identifier<M: Model>(model: &M) -> Option<String> {
    let values = values_by_tag(model, Tag::Column).ok()?;
    match values.get(M::ID_COLUMN)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Find the descriptor whose Rust field name matches `field`, ignoring case and underscores, so
/// `createdAt`, `CreatedAt` and `created_at` all resolve to the same field.
fn field_named<M: Model>(field: &str) -> Option<&'static FieldDescriptor> {
    M::fields()
        .iter()
        .find(|f| to_camel_case(f.name).eq_ignore_ascii_case(&to_camel_case(field)))
}

/// Identifier fields: uuid-typed or carrying a uuid validation rule.
pub fn is_identifier<M: Model>(field: &str) -> bool {
    field_named::<M>(field)
        .map(|f| f.kind == FieldKind::Uuid || f.rules.contains("uuid"))
        .unwrap_or(false)
}

pub fn is_datetime<M: Model>(field: &str) -> bool {
    field_named::<M>(field)
        .map(|f| f.kind == FieldKind::Datetime)
        .unwrap_or(false)
}

pub fn is_boolean<M: Model>(field: &str) -> bool {
    field_named::<M>(field)
        .map(|f| f.kind == FieldKind::Boolean)
        .unwrap_or(false)
}
