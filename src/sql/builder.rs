//! Builds parameterized INSERT, SELECT, UPDATE, DELETE and COUNT statements from a model's field
//! descriptors and a `FindBy`. Identifiers come from the descriptors only; values are parameters.

use crate::filter::FindBy;
use crate::model::{tag_map, tag_values, values_by_tag, FieldKind, Model, Tag};
use crate::repository::RepositoryError;
use crate::sql::PgBindValue;
use serde_json::Value;

/// Quote identifier for PostgreSQL (safe: only from descriptors).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Table name, optionally schema qualified (`schema.table`).
fn qualified_table(table: &str) -> String {
    table.split('.').map(quoted).collect::<Vec<_>>().join(".")
}

#[derive(Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<PgBindValue>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    /// Push a parameter and return its placeholder, with a cast when the column is not text.
    fn push_param(&mut self, v: PgBindValue, kind: FieldKind) -> String {
        self.params.push(v);
        let n = self.params.len();
        match kind.pg_cast() {
            Some(t) => format!("${}::{}", n, t),
            None => format!("${}", n),
        }
    }
}

fn kind_of_column<M: Model>(column: &str) -> FieldKind {
    M::fields()
        .iter()
        .find(|f| f.column == column)
        .map(|f| f.kind)
        .unwrap_or(FieldKind::Text)
}

/// Selected columns. NUMERIC has no decoder without an extra sqlx feature, so number columns
/// come back as text under their own name.
fn select_column_list<M: Model>() -> String {
    tag_values::<M>(Tag::Column)
        .into_iter()
        .map(|col| match kind_of_column::<M>(col) {
            FieldKind::Number => format!("{}::text AS {}", quoted(col), quoted(col)),
            _ => quoted(col),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// SELECT by identifier column, at most one row.
pub fn select_by_id<M: Model>(table: &str, id: &str) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(
        PgBindValue::String(id.to_string()),
        kind_of_column::<M>(M::ID_COLUMN),
    );
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {} LIMIT 1",
        select_column_list::<M>(),
        qualified_table(table),
        quoted(M::ID_COLUMN),
        ph
    );
    q
}

/// SELECT with exact-match conditions, substring search, ordering and optional OFFSET / LIMIT.
/// Fails before touching storage when a field is unknown or filtered twice.
pub fn select_filtered<M: Model>(
    table: &str,
    fb: &FindBy,
    add_offset: bool,
    add_limit: bool,
) -> Result<QueryBuf, RepositoryError> {
    let columns = tag_map::<M>(Tag::Wire, Tag::Column);
    let column_for = |field: &str| {
        columns
            .get(field)
            .map(String::as_str)
            .ok_or_else(|| RepositoryError::UnknownProperty(field.to_string()))
    };
    let mut q = QueryBuf::new();

    let mut where_parts = Vec::new();
    for (field, value) in &fb.conditions {
        let col = column_for(field)?;
        let kind = kind_of_column::<M>(col);
        let ph = q.push_param(PgBindValue::from_json(value), kind);
        where_parts.push(format!("{} = {}", quoted(col), ph));
    }
    for (field, value) in &fb.search {
        if fb.conditions.contains_key(field) {
            return Err(RepositoryError::AlreadyFiltered(field.clone()));
        }
        let col = column_for(field)?;
        let ph = q.push_param(
            PgBindValue::String(format!("%{}%", value_text(value))),
            FieldKind::Text,
        );
        let lhs = match kind_of_column::<M>(col) {
            FieldKind::Text => quoted(col),
            _ => format!("{}::text", quoted(col)),
        };
        where_parts.push(format!("{} LIKE {}", lhs, ph));
    }

    let mut order_parts = Vec::new();
    for (field, direction) in &fb.order_by {
        let col = column_for(field)?;
        let dir = if direction == "asc" { "ASC" } else { "DESC" };
        order_parts.push(format!("{} {}", quoted(col), dir));
    }

    let where_clause = if where_parts.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_parts.join(" AND "))
    };
    let order_clause = if order_parts.is_empty() {
        String::new()
    } else {
        format!(" ORDER BY {}", order_parts.join(", "))
    };
    let limit_clause = if add_limit && fb.limit != 0 {
        format!(" LIMIT {}", fb.limit)
    } else {
        String::new()
    };
    let offset_clause = if add_offset && fb.offset != 0 {
        format!(" OFFSET {}", fb.offset)
    } else {
        String::new()
    };
    q.sql = format!(
        "SELECT {} FROM {}{}{}{}{}",
        select_column_list::<M>(),
        qualified_table(table),
        where_clause,
        order_clause,
        limit_clause,
        offset_clause
    );
    Ok(q)
}

/// Filtered SELECT for a single row: LIMIT 1 whatever limit the filter carries.
pub fn select_one<M: Model>(table: &str, fb: &FindBy) -> Result<QueryBuf, RepositoryError> {
    let mut fb = fb.clone();
    fb.limit = 1;
    select_filtered::<M>(table, &fb, true, true)
}

/// COUNT(*) over the filtered query, ignoring limit and offset.
pub fn count<M: Model>(table: &str, fb: &FindBy) -> Result<QueryBuf, RepositoryError> {
    let inner = select_filtered::<M>(table, fb, false, false)?;
    Ok(QueryBuf {
        sql: format!("SELECT COUNT(*) FROM ({}) AS count", inner.sql),
        params: inner.params,
    })
}

/// INSERT every mapped column with the record's values.
pub fn insert<M: Model>(table: &str, record: &M) -> Result<QueryBuf, RepositoryError> {
    let values = values_by_tag(record, Tag::Column)?;
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for col in tag_values::<M>(Tag::Column) {
        let val = values.get(col).unwrap_or(&Value::Null);
        placeholders.push(q.push_param(PgBindValue::from_json(val), kind_of_column::<M>(col)));
        cols.push(quoted(col));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        qualified_table(table),
        cols.join(", "),
        placeholders.join(", ")
    );
    Ok(q)
}

fn id_value<M: Model>(values: &serde_json::Map<String, Value>) -> Result<PgBindValue, RepositoryError> {
    match values.get(M::ID_COLUMN) {
        Some(v) if !v.is_null() && v != &Value::String(String::new()) => Ok(PgBindValue::from_json(v)),
        _ => Err(RepositoryError::MissingIdentifier),
    }
}

/// UPDATE every mapped column except the identifier, matched by the record's identifier.
pub fn update<M: Model>(table: &str, record: &M) -> Result<QueryBuf, RepositoryError> {
    let values = values_by_tag(record, Tag::Column)?;
    let id = id_value::<M>(&values)?;
    let mut q = QueryBuf::new();
    let mut sets = Vec::new();
    for col in tag_values::<M>(Tag::Column) {
        if col == M::ID_COLUMN {
            continue;
        }
        let val = values.get(col).unwrap_or(&Value::Null);
        let ph = q.push_param(PgBindValue::from_json(val), kind_of_column::<M>(col));
        sets.push(format!("{} = {}", quoted(col), ph));
    }
    let id_ph = q.push_param(id, kind_of_column::<M>(M::ID_COLUMN));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {}",
        qualified_table(table),
        sets.join(", "),
        quoted(M::ID_COLUMN),
        id_ph
    );
    Ok(q)
}

/// DELETE by the record's identifier.
pub fn delete<M: Model>(table: &str, record: &M) -> Result<QueryBuf, RepositoryError> {
    let values = values_by_tag(record, Tag::Column)?;
    let id = id_value::<M>(&values)?;
    let mut q = QueryBuf::new();
    let ph = q.push_param(id, kind_of_column::<M>(M::ID_COLUMN));
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        qualified_table(table),
        quoted(M::ID_COLUMN),
        ph
    );
    Ok(q)
}
