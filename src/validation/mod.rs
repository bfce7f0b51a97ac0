//! Field validation: a small rule engine behind the `Validator` trait, plus request body decoding.
//! The validator is built once at startup and handed to whoever needs it.

mod request;

pub use request::RequestDecoder;

use crate::model::{values_by_tag, FieldDescriptor, Model, Tag};
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Separator used whenever several messages are reported as one error.
pub const ERROR_DELIMITER: &str = " || ";

/// Lowercase hyphenated UUID version 4.
static UUID4_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("UUID v4 regex is valid")
});

#[derive(Clone, Debug, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub rule: String,
    pub value: Value,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match &self.value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        write!(f, "{}: Failed validation for {} with value {}", self.field, self.rule, value)
    }
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(ERROR_DELIMITER)
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("{}", join(.0))]
    Fields(Vec<FieldError>),
    #[error("{}", join(.0))]
    Request(Vec<String>),
    #[error("unknown validation rule '{0}'")]
    UnknownRule(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub trait Validator: Send + Sync {
    /// Validate a single value against comma separated rules (e.g. `"uuid4"`, `"min=3,max=63"`).
    fn var(&self, value: &Value, rules: &str) -> Result<(), ValidationError>;

    /// Validate a wire-keyed record against each descriptor's rules, collecting every failure.
    fn record(&self, values: &Map<String, Value>, fields: &[FieldDescriptor]) -> Result<(), ValidationError>;
}

/// Validate a model instance against the rules declared on its fields.
pub fn validate_model<M: Model>(validator: &dyn Validator, model: &M) -> Result<(), ValidationError> {
    let values = values_by_tag(model, Tag::Wire)?;
    validator.record(&values, M::fields())
}

/// Built-in rules: `required`, `notblank`, `uuid`, `uuid4`, `email`, `min=N`, `max=N`.
#[derive(Clone, Debug, Default)]
pub struct RuleValidator;

impl RuleValidator {
    pub fn new() -> Self {
        RuleValidator
    }

    fn check(&self, field: &str, value: &Value, rules: &str) -> Result<Vec<FieldError>, ValidationError> {
        let mut failures = Vec::new();
        for rule in rules.split(',').map(str::trim).filter(|r| !r.is_empty()) {
            let (name, param) = match rule.split_once('=') {
                Some((n, p)) => (n, Some(p)),
                None => (rule, None),
            };
            if !passes(name, param, value)? {
                failures.push(FieldError {
                    field: field.to_string(),
                    rule: name.to_string(),
                    value: value.clone(),
                });
            }
        }
        Ok(failures)
    }
}

impl Validator for RuleValidator {
    fn var(&self, value: &Value, rules: &str) -> Result<(), ValidationError> {
        let failures = self.check("", value, rules)?;
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Fields(failures))
        }
    }

    fn record(&self, values: &Map<String, Value>, fields: &[FieldDescriptor]) -> Result<(), ValidationError> {
        let mut failures = Vec::new();
        for f in fields.iter().filter(|f| !f.rules.is_empty()) {
            let value = values.get(f.wire).unwrap_or(&Value::Null);
            failures.extend(self.check(f.wire, value, f.rules)?);
        }
        if failures.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Fields(failures))
        }
    }
}

fn passes(rule: &str, param: Option<&str>, v: &Value) -> Result<bool, ValidationError> {
    if rule == "required" {
        return Ok(match v {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        });
    }
    // Every other rule only constrains values that are present.
    if v.is_null() {
        return Ok(true);
    }
    let ok = match rule {
        "notblank" => v.as_str().map(|s| !s.trim().is_empty()).unwrap_or(true),
        "uuid" => v
            .as_str()
            .map(|s| uuid::Uuid::parse_str(s).is_ok())
            .unwrap_or(false),
        "uuid4" => v.as_str().map(|s| UUID4_REGEX.is_match(s)).unwrap_or(false),
        "email" => v
            .as_str()
            .map(|s| s.contains('@') && s.len() >= 3)
            .unwrap_or(false),
        "min" | "max" => {
            let bound: f64 = param
                .and_then(|p| p.parse().ok())
                .ok_or_else(|| ValidationError::UnknownRule(format!("{}={}", rule, param.unwrap_or(""))))?;
            let measured = match v {
                Value::String(s) => s.chars().count() as f64,
                Value::Number(n) => n.as_f64().unwrap_or(0.0),
                Value::Array(a) => a.len() as f64,
                _ => return Ok(false),
            };
            if rule == "min" {
                measured >= bound
            } else {
                measured <= bound
            }
        }
        other => return Err(ValidationError::UnknownRule(other.to_string())),
    };
    Ok(ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Widget;
    use serde_json::json;

    #[test]
    fn uuid4_accepts_lowercase_v4_only() {
        let v = RuleValidator::new();
        assert!(v.var(&json!("c24b2909-92e3-4266-ac13-95ac9f24388f"), "uuid4").is_ok());
        assert!(v.var(&json!("test"), "uuid4").is_err());
        // version 1
        assert!(v.var(&json!("c24b2909-92e3-1266-ac13-95ac9f24388f"), "uuid4").is_err());
    }

    #[test]
    fn min_max_on_strings() {
        let v = RuleValidator::new();
        assert!(v.var(&json!("abc"), "min=3,max=63").is_ok());
        let err = v.var(&json!("ab"), "min=3,max=63").unwrap_err();
        assert_eq!(err.to_string(), ": Failed validation for min with value ab");
    }

    #[test]
    fn null_only_fails_required() {
        let v = RuleValidator::new();
        assert!(v.var(&Value::Null, "uuid4,min=3").is_ok());
        assert!(v.var(&Value::Null, "required").is_err());
    }

    #[test]
    fn unknown_rule_is_reported() {
        let v = RuleValidator::new();
        assert!(matches!(
            v.var(&json!("x"), "bogus"),
            Err(ValidationError::UnknownRule(r)) if r == "bogus"
        ));
    }

    #[test]
    fn model_failures_are_joined() {
        let mut w = Widget::sample();
        w.id = "nope".into();
        w.name = Some("ab".into());
        let err = validate_model(&RuleValidator::new(), &w).unwrap_err();
        assert_eq!(
            err.to_string(),
            "id: Failed validation for uuid4 with value nope || name: Failed validation for min with value ab"
        );
    }

    #[test]
    fn valid_model_passes() {
        assert!(validate_model(&RuleValidator::new(), &Widget::sample()).is_ok());
    }
}
