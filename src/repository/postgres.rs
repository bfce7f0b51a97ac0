//! `Repository` over a PostgreSQL pool.

use super::{Repository, RepositoryError};
use crate::filter::FindBy;
use crate::filter::value_for_kind;
use crate::model::{tag_map, FieldKind, Model, Tag};
use crate::sql::{self, QueryBuf};
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use std::marker::PhantomData;

/// Bound to one pool and one table; holds no other state.
pub struct PgRepository<M> {
    pool: PgPool,
    table: String,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> PgRepository<M> {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        PgRepository {
            pool,
            table: table.into(),
            _model: PhantomData,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn bind<'q>(
        q: &'q QueryBuf,
    ) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        query
    }

    async fn fetch_optional(&self, q: &QueryBuf) -> Result<Option<M>, RepositoryError> {
        let row = Self::bind(q).fetch_optional(&self.pool).await?;
        row.map(|r| row_to_model::<M>(&r)).transpose()
    }

    async fn execute(&self, q: &QueryBuf) -> Result<(), RepositoryError> {
        Self::bind(q).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl<M: Model> Repository<M> for PgRepository<M> {
    async fn find(&self, id: &str) -> Result<Option<M>, RepositoryError> {
        let q = sql::select_by_id::<M>(&self.table, id);
        self.fetch_optional(&q).await
    }

    async fn find_one_by(&self, find_by: &FindBy) -> Result<Option<M>, RepositoryError> {
        let q = sql::select_one::<M>(&self.table, find_by)?;
        self.fetch_optional(&q).await
    }

    async fn find_by(&self, find_by: &FindBy) -> Result<Vec<M>, RepositoryError> {
        let q = sql::select_filtered::<M>(&self.table, find_by, true, true)?;
        let rows = Self::bind(&q).fetch_all(&self.pool).await?;
        rows.iter().map(row_to_model::<M>).collect()
    }

    async fn create(&self, record: &M) -> Result<(), RepositoryError> {
        let q = sql::insert(&self.table, record)?;
        self.execute(&q).await
    }

    async fn update(&self, record: &M) -> Result<(), RepositoryError> {
        let q = sql::update(&self.table, record)?;
        self.execute(&q).await
    }

    async fn delete(&self, record: &M) -> Result<(), RepositoryError> {
        let q = sql::delete(&self.table, record)?;
        self.execute(&q).await
    }

    async fn count(&self, find_by: &FindBy) -> Result<i64, RepositoryError> {
        let q = sql::count::<M>(&self.table, find_by)?;
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query_scalar::<_, i64>(&q.sql);
        for p in &q.params {
            query = query.bind(p.clone());
        }
        Ok(query.fetch_one(&self.pool).await?)
    }
}

/// Decode a row: read each column, re-key it by wire name, then deserialize the model.
fn row_to_model<M: Model>(row: &PgRow) -> Result<M, RepositoryError> {
    use sqlx::{Column, Row};
    let wire_names = tag_map::<M>(Tag::Column, Tag::Wire);
    let mut map = Map::new();
    for col in row.columns() {
        let name = col.name();
        let key = wire_names.get(name).map(String::as_str).unwrap_or(name);
        let value = if is_number_column::<M>(name) {
            numeric_cell(row.try_get::<Option<String>, _>(name).ok().flatten())
        } else {
            cell_to_value(row, name)
        };
        map.insert(key.to_string(), value);
    }
    Ok(serde_json::from_value(Value::Object(map))?)
}

fn is_number_column<M: Model>(column: &str) -> bool {
    M::fields()
        .iter()
        .any(|f| f.column == column && f.kind == FieldKind::Number)
}

/// Number columns are selected as text; parse them back into JSON numbers.
fn numeric_cell(text: Option<String>) -> Value {
    match text {
        Some(s) => value_for_kind(FieldKind::Number, &s),
        None => Value::Null,
    }
}

fn cell_to_value(row: &PgRow, name: &str) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(name) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(f64::from(n)) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(name) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(name) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(name) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(name) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(name) {
        return Value::String(d.and_utc().to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(name) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(name) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(name) {
        return j;
    }
    Value::Null
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::Widget;
    use serde_json::json;

    #[test]
    fn numeric_text_reads_back_as_numbers() {
        assert_eq!(numeric_cell(Some("42".into())), json!(42));
        assert_eq!(numeric_cell(Some("12.50".into())), json!(12.5));
        assert_eq!(numeric_cell(None), Value::Null);
    }

    #[test]
    fn only_number_kinds_take_the_text_path() {
        assert!(!is_number_column::<Widget>("name"));
        assert!(!is_number_column::<Widget>("show_product"));
    }
}
