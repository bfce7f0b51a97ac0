//! Decode JSON request bodies into models, rejecting keys the model does not have or that the
//! endpoint does not allow to be set. All key problems are reported together.

use super::ValidationError;
use crate::error::ConfigError;
use crate::model::{Model, SKIP};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::marker::PhantomData;

pub struct RequestDecoder<M> {
    /// Rust field names that may be set. Empty means every field.
    allowed: HashSet<&'static str>,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> RequestDecoder<M> {
    /// `valid_fields` are Rust field names. Naming a field the model does not declare is a setup
    /// error and is reported here, not per request.
    pub fn new(valid_fields: &[&str]) -> Result<Self, ConfigError> {
        let mut allowed = HashSet::new();
        for name in valid_fields {
            let f = M::fields()
                .iter()
                .find(|f| f.name == *name)
                .ok_or_else(|| ConfigError::UnknownField {
                    model: std::any::type_name::<M>(),
                    field: name.to_string(),
                })?;
            allowed.insert(f.name);
        }
        Ok(RequestDecoder {
            allowed,
            _model: PhantomData,
        })
    }

    /// Wire key (or field name when the field has no wire name) -> Rust field name.
    fn key_map() -> HashMap<&'static str, &'static str> {
        M::fields()
            .iter()
            .map(|f| {
                let key = if f.wire.is_empty() || f.wire == SKIP { f.name } else { f.wire };
                (key, f.name)
            })
            .collect()
    }

    /// Parse `body` as a JSON object and check every top-level key.
    pub fn checked_values(&self, body: &[u8]) -> Result<Map<String, Value>, ValidationError> {
        let values: Map<String, Value> = serde_json::from_slice(body)?;
        let keys = Self::key_map();
        let mut errs = Vec::new();
        for key in values.keys() {
            let Some(field) = keys.get(key.as_str()) else {
                errs.push(format!("{}: This property does not exist.", key));
                continue;
            };
            if !self.allowed.is_empty() && !self.allowed.contains(field) {
                errs.push(format!("{}: This property is not allowed to be set.", key));
            }
        }
        if !errs.is_empty() {
            return Err(ValidationError::Request(errs));
        }
        Ok(values)
    }

    /// Decode a complete model from `body`.
    pub fn decode(&self, body: &[u8]) -> Result<M, ValidationError> {
        let values = self.checked_values(body)?;
        Ok(serde_json::from_value(Value::Object(values))?)
    }

    /// Overlay the keys present in `body` onto `target`, leaving the other fields untouched.
    pub fn decode_into(&self, body: &[u8], target: &mut M) -> Result<(), ValidationError> {
        let values = self.checked_values(body)?;
        let mut current = match serde_json::to_value(&*target)? {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        current.extend(values);
        *target = serde_json::from_value(Value::Object(current))?;
        Ok(())
    }
}
