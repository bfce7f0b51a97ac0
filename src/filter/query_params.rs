//! Query-string filter parsing: `field=value`, `search[field]=value`, `sort[field]=asc|desc`.
//! Stops at the first problem.

use super::{value_for_kind, FindBy};
use crate::model::{is_boolean, is_datetime, is_identifier, tag_map, FieldKind, Model, Tag};
use crate::validation::Validator;
use serde_json::Value;
use std::borrow::Cow;
use thiserror::Error;

/// Scalar keys handled elsewhere (pagination, or the array forms).
const RESERVED: &[&str] = &["sort", "page", "size", "search"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryParamError {
    #[error("{0}: This property does not exist.")]
    UnknownProperty(String),
    #[error("{key}: '{field}' field cannot be blank.")]
    BlankField { key: String, field: String },
    #[error("{0}: Cannot be blank.")]
    Blank(String),
    #[error("search: cannot search by '{0}' field")]
    NotSearchable(String),
    #[error("The sort field '{field}' has an invalid value of '{value}'. The valid values are 'asc' or 'desc'.")]
    InvalidSortDirection { field: String, value: String },
    #[error("sort: cannot sort by id")]
    SortById,
    #[error("sort: cannot sort by{0}")]
    SortByPassword(String),
    #[error("{0}: Invalid UUID v4.")]
    InvalidUuid(String),
    #[error("{0}: Not allowed to filter by.")]
    NotFilterable(String),
}

/// Parse the query string of `uri` into `fb`, validating every field against `M`.
/// Only the part after the first `?` is read; a uri without one has nothing to parse.
pub fn parse_query_params<M: Model>(
    uri: &str,
    fb: &mut FindBy,
    validator: &dyn Validator,
) -> Result<(), QueryParamError> {
    let Some((_, query)) = uri.split_once('?') else {
        return Ok(());
    };
    let query = query.split('#').next().unwrap_or("");
    let fields = tag_map::<M>(Tag::Wire, Tag::Column);

    for segment in query.split('&').filter(|s| !s.is_empty()) {
        let has_value = segment.contains('=');
        let (name, value) = decode_pair(segment);

        if let Some(open) = name.find('[') {
            let key = &name[..open];
            let rest = &name[open + 1..];
            let field = rest.find(']').map(|close| &rest[..close]).unwrap_or(rest);

            if !has_value {
                return Err(QueryParamError::BlankField {
                    key: key.to_string(),
                    field: field.to_string(),
                });
            }
            if !fields.contains_key(field) {
                return Err(QueryParamError::UnknownProperty(field.to_string()));
            }

            match key {
                "search" => {
                    if is_identifier::<M>(field) || is_datetime::<M>(field) || is_boolean::<M>(field) {
                        return Err(QueryParamError::NotSearchable(field.to_string()));
                    }
                    if value.is_empty() {
                        return Err(QueryParamError::BlankField {
                            key: key.to_string(),
                            field: field.to_string(),
                        });
                    }
                    fb.search.insert(field.to_string(), Value::String(value.into_owned()));
                }
                "sort" => {
                    if value != "asc" && value != "desc" {
                        return Err(QueryParamError::InvalidSortDirection {
                            field: field.to_string(),
                            value: value.into_owned(),
                        });
                    }
                    if field == "id" {
                        return Err(QueryParamError::SortById);
                    }
                    if field == "password" {
                        return Err(QueryParamError::SortByPassword(field.to_string()));
                    }
                    fb.order_by.insert(field.to_string(), value.into_owned());
                }
                _ => return Err(QueryParamError::UnknownProperty(key.to_string())),
            }
            continue;
        }

        if !has_value {
            return Err(QueryParamError::Blank(name.into_owned()));
        }
        let key = name.as_ref();
        if RESERVED.contains(&key) {
            continue;
        }
        if !fields.contains_key(key) {
            return Err(QueryParamError::UnknownProperty(key.to_string()));
        }
        if is_identifier::<M>(key)
            && validator
                .var(&Value::String(value.to_string()), "uuid4")
                .is_err()
        {
            return Err(QueryParamError::InvalidUuid(key.to_string()));
        }
        if is_datetime::<M>(key) {
            return Err(QueryParamError::NotFilterable(key.to_string()));
        }
        if value.is_empty() {
            return Err(QueryParamError::Blank(key.to_string()));
        }
        let kind = M::field(key).map(|f| f.kind).unwrap_or(FieldKind::Text);
        fb.conditions.insert(key.to_string(), value_for_kind(kind, &value));
    }

    Ok(())
}

/// Percent-decode one `name=value` segment, splitting at the first `=`.
fn decode_pair(segment: &str) -> (Cow<'_, str>, Cow<'_, str>) {
    url::form_urlencoded::parse(segment.as_bytes())
        .next()
        .unwrap_or((Cow::Borrowed(""), Cow::Borrowed("")))
}
