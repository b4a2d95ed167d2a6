//! PostgreSQL-backed collaborators: record fetch under row-level security, layouts, users.

use crate::config::LayoutConfig;
use crate::error::{AppError, ConfigError};
use crate::service::{Department, LayoutStore, QueryExecutor, Record, UserContext, UserStore};
use crate::sql::{PgBindValue, QueryBuf};
use crate::store::qualified_sys_table;
use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;

/// Runs projections with `app.user_id` set for the transaction, so RLS policies
/// on data tables can scope rows to the requesting user.
#[derive(Clone)]
pub struct PgQueryExecutor {
    pool: PgPool,
}

impl PgQueryExecutor {
    pub fn new(pool: PgPool) -> Self {
        PgQueryExecutor { pool }
    }
}

#[async_trait]
impl QueryExecutor for PgQueryExecutor {
    async fn fetch_one(&self, query: &QueryBuf, record_id: &Value, user: &str) -> Result<Option<Record>, AppError> {
        tracing::debug!(sql = %query.sql, record = %record_id, user = %user, "query");
        let mut tx = self.pool.begin().await?;
        sqlx::query("SELECT set_config('app.user_id', $1, true)")
            .bind(user)
            .execute(&mut *tx)
            .await?;
        let row = sqlx::query(&query.sql)
            .bind(PgBindValue::from(record_id))
            .fetch_optional(&mut *tx)
            .await?;
        tx.rollback().await?;
        Ok(row.map(|r| Record::from(row_to_json(&r))))
    }
}

/// Layouts from `_sys_layouts`: the user's own layout wins over the shared one.
#[derive(Clone)]
pub struct PgLayoutStore {
    pool: PgPool,
}

impl PgLayoutStore {
    pub fn new(pool: PgPool) -> Self {
        PgLayoutStore { pool }
    }
}

#[async_trait]
impl LayoutStore for PgLayoutStore {
    async fn layout(&self, entity: &str, user: &str) -> Result<Option<LayoutConfig>, AppError> {
        let sql = format!(
            "SELECT payload FROM {} WHERE payload->>'entity' = $1 \
             AND (payload->>'applies_to' = $2 OR payload->>'applies_to' IS NULL) \
             ORDER BY (payload->>'applies_to' IS NULL), updated_at DESC LIMIT 1",
            qualified_sys_table("_sys_layouts")
        );
        tracing::debug!(sql = %sql, entity = %entity, user = %user, "query");
        let payload = sqlx::query_scalar::<_, Value>(&sql)
            .bind(entity)
            .bind(user)
            .fetch_optional(&self.pool)
            .await?;
        match payload {
            Some(p) => {
                let layout: LayoutConfig = serde_json::from_value(p)
                    .map_err(|e| ConfigError::Load(format!("layout for {}: {}", entity, e)))?;
                Ok(Some(layout))
            }
            None => Ok(None),
        }
    }
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        PgUserStore { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn resolve(&self, user: &str) -> Result<Option<UserContext>, AppError> {
        let sql = format!(
            "SELECT u.id, u.full_name, d.id, d.name FROM {} u LEFT JOIN {} d ON d.id = u.dept_id WHERE u.id = $1",
            qualified_sys_table("_sys_users"),
            qualified_sys_table("_sys_departments")
        );
        tracing::debug!(sql = %sql, user = %user, "query");
        let row = sqlx::query_as::<_, (String, String, Option<String>, Option<String>)>(&sql)
            .bind(user)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(id, full_name, dept_id, dept_name)| UserContext {
            id,
            full_name,
            department: match (dept_id, dept_name) {
                (Some(id), Some(name)) => Some(Department { id, name }),
                _ => None,
            },
        }))
    }
}

fn row_to_json(row: &sqlx::postgres::PgRow) -> serde_json::Map<String, Value> {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = serde_json::Map::new();
    for col in row.columns() {
        let name = col.name();
        map.insert(name.to_string(), cell_to_value(row, name));
    }
    map
}

fn cell_to_value(row: &sqlx::postgres::PgRow, name: &str) -> Value {
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
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
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
