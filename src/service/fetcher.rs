//! Record loading for edit and view forms.

use crate::config::{EntityDefinition, MetadataRegistry, PkType, MODIFIED_ON};
use crate::error::AppError;
use crate::service::{parse_timestamp, QueryExecutor};
use crate::sql::{label_key, select_projection};
use serde_json::{Map, Value};
use std::sync::Arc;

/// One projected row keyed by field name. Reference label columns are keyed `&field`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    values: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Record::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.values.insert(field.into(), value);
        self
    }

    /// Stored value of `field`; SQL NULL reads as absent.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field).filter(|v| !v.is_null())
    }

    pub fn has_value(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    /// Display label joined in for a reference field.
    pub fn label(&self, field: &str) -> Option<&str> {
        self.values.get(&label_key(field)).and_then(Value::as_str)
    }

    /// Last-modified timestamp in epoch milliseconds.
    pub fn last_modified(&self) -> Option<i64> {
        match self.get(MODIFIED_ON)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => parse_timestamp(s).map(|t| t.and_utc().timestamp_millis()),
            _ => None,
        }
    }

    /// Keep only the given keys.
    pub fn project(&self, columns: &[String]) -> Record {
        let values = columns
            .iter()
            .filter_map(|c| self.values.get(c).map(|v| (c.clone(), v.clone())))
            .collect();
        Record { values }
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.values
    }
}

impl From<Map<String, Value>> for Record {
    fn from(values: Map<String, Value>) -> Self {
        Record { values }
    }
}

/// Parse a record id according to the entity's primary key type.
pub fn parse_record_id(id_str: &str, pk_type: &PkType) -> Result<Value, AppError> {
    Ok(match pk_type {
        PkType::Uuid => {
            let u = uuid::Uuid::parse_str(id_str)
                .map_err(|_| AppError::InvalidInvocation(format!("invalid record id: {}", id_str)))?;
            Value::String(u.to_string())
        }
        PkType::BigInt | PkType::Int => {
            let n: i64 = id_str
                .parse()
                .map_err(|_| AppError::InvalidInvocation(format!("invalid record id: {}", id_str)))?;
            Value::Number(n.into())
        }
        PkType::Text => Value::String(id_str.to_string()),
    })
}

/// Builds the minimal projection for a layout and runs it through the executor.
#[derive(Clone)]
pub struct RecordFetcher {
    executor: Arc<dyn QueryExecutor>,
}

impl RecordFetcher {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        RecordFetcher { executor }
    }

    /// Load `record_id` with exactly the `fields` named by the layout.
    /// `None` means deleted or not visible to `user`; the two are not distinguished.
    pub async fn fetch(
        &self,
        registry: &MetadataRegistry,
        entity: &EntityDefinition,
        fields: &[&str],
        record_id: &str,
        user: &str,
    ) -> Result<Option<Record>, AppError> {
        if fields.is_empty() {
            return Ok(None);
        }
        let id = parse_record_id(record_id, &entity.pk_type)?;
        let q = select_projection(registry, entity, fields);
        self.executor.fetch_one(&q, &id, user).await
    }
}
