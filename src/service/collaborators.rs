//! Interfaces the form builder consumes. Each is owned and cached by its provider;
//! the builder only reads through them.

use crate::config::{EntityDefinition, FieldDefinition, LayoutConfig};
use crate::error::AppError;
use crate::service::{PickOption, Record};
use crate::sql::QueryBuf;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Department {
    pub id: String,
    pub name: String,
}

/// The acting user as needed to stamp system fields on a new record.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub id: String,
    pub full_name: String,
    pub department: Option<Department>,
}

/// Entity- and record-level access checks.
#[async_trait]
pub trait PermissionOracle: Send + Sync {
    async fn can_create(&self, user: &str, entity: &EntityDefinition) -> Result<bool, AppError>;
    async fn can_read(&self, user: &str, entity: &EntityDefinition, record: &str) -> Result<bool, AppError>;
    async fn can_update(&self, user: &str, entity: &EntityDefinition, record: &str) -> Result<bool, AppError>;
}

#[async_trait]
pub trait LayoutStore: Send + Sync {
    /// Layout for `entity` as seen by `user`: the user's own layout if any, else the shared one.
    async fn layout(&self, entity: &str, user: &str) -> Result<Option<LayoutConfig>, AppError>;
}

/// Option lists and classification lookups, served from memory.
pub trait OptionResolver: Send + Sync {
    fn list_options(&self, entity: &str, field: &FieldDefinition) -> Vec<PickOption>;
    fn option_label(&self, id: &str) -> Option<String>;
    /// Breadcrumb name of a classification item, root first.
    fn classification_name(&self, id: &str) -> Option<String>;
    fn open_level(&self, field: &FieldDefinition) -> i32;
}

/// Runs a single-row projection under the user's row-level read scope.
/// Returns `None` both when the row is missing and when it is not visible.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn fetch_one(&self, query: &QueryBuf, record_id: &Value, user: &str) -> Result<Option<Record>, AppError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn resolve(&self, user: &str) -> Result<Option<UserContext>, AppError>;
}
