//! In-process collaborators for embedding without a database, and for tests.

use crate::config::{EntityDefinition, LayoutConfig};
use crate::error::AppError;
use crate::service::{LayoutStore, PermissionOracle, QueryExecutor, Record, UserContext, UserStore};
use crate::sql::QueryBuf;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

fn lock_poisoned() -> AppError {
    AppError::Internal("in-memory store lock poisoned".into())
}

fn id_text(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Layouts keyed by entity; a user-scoped layout wins over the shared one.
#[derive(Default)]
pub struct InMemoryLayouts {
    layouts: RwLock<Vec<LayoutConfig>>,
}

impl InMemoryLayouts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any layout with the same entity and owner.
    pub fn put(&self, layout: LayoutConfig) -> Result<(), AppError> {
        let mut layouts = self.layouts.write().map_err(|_| lock_poisoned())?;
        layouts.retain(|l| !(l.entity == layout.entity && l.applies_to == layout.applies_to));
        layouts.push(layout);
        Ok(())
    }

    pub fn remove(&self, entity: &str) -> Result<(), AppError> {
        let mut layouts = self.layouts.write().map_err(|_| lock_poisoned())?;
        layouts.retain(|l| l.entity != entity);
        Ok(())
    }
}

#[async_trait]
impl LayoutStore for InMemoryLayouts {
    async fn layout(&self, entity: &str, user: &str) -> Result<Option<LayoutConfig>, AppError> {
        let layouts = self.layouts.read().map_err(|_| lock_poisoned())?;
        let own = layouts
            .iter()
            .find(|l| l.entity == entity && l.applies_to.as_deref() == Some(user));
        let shared = || layouts.iter().find(|l| l.entity == entity && l.applies_to.is_none());
        Ok(own.or_else(shared).cloned())
    }
}

/// Rows keyed by record id, with per-user hiding standing in for row-level security.
#[derive(Default)]
pub struct InMemoryRecords {
    rows: RwLock<HashMap<String, Record>>,
    hidden: RwLock<HashSet<(String, String)>>,
}

impl InMemoryRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, id: impl Into<String>, record: Record) -> Result<(), AppError> {
        self.rows.write().map_err(|_| lock_poisoned())?.insert(id.into(), record);
        Ok(())
    }

    pub fn delete(&self, id: &str) -> Result<(), AppError> {
        self.rows.write().map_err(|_| lock_poisoned())?.remove(id);
        Ok(())
    }

    /// Make `id` invisible to `user`, as a revoked row policy would.
    pub fn hide_from(&self, user: &str, id: &str) -> Result<(), AppError> {
        self.hidden
            .write()
            .map_err(|_| lock_poisoned())?
            .insert((user.to_string(), id.to_string()));
        Ok(())
    }
}

#[async_trait]
impl QueryExecutor for InMemoryRecords {
    async fn fetch_one(&self, query: &QueryBuf, record_id: &Value, user: &str) -> Result<Option<Record>, AppError> {
        let id = id_text(record_id);
        if self
            .hidden
            .read()
            .map_err(|_| lock_poisoned())?
            .contains(&(user.to_string(), id.clone()))
        {
            return Ok(None);
        }
        let rows = self.rows.read().map_err(|_| lock_poisoned())?;
        Ok(rows.get(&id).map(|r| r.project(&query.columns)))
    }
}

/// Allow-all oracle with per-entity denials.
#[derive(Default)]
pub struct StaticPermissions {
    no_create: RwLock<HashSet<String>>,
    no_read: RwLock<HashSet<String>>,
    no_update: RwLock<HashSet<String>>,
}

impl StaticPermissions {
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn deny_create(&self, entity: &str) -> Result<(), AppError> {
        Self::deny(&self.no_create, entity)
    }

    pub fn deny_read(&self, entity: &str) -> Result<(), AppError> {
        Self::deny(&self.no_read, entity)
    }

    pub fn deny_update(&self, entity: &str) -> Result<(), AppError> {
        Self::deny(&self.no_update, entity)
    }

    fn deny(set: &RwLock<HashSet<String>>, entity: &str) -> Result<(), AppError> {
        set.write().map_err(|_| lock_poisoned())?.insert(entity.to_string());
        Ok(())
    }

    fn allowed(set: &RwLock<HashSet<String>>, entity: &EntityDefinition) -> Result<bool, AppError> {
        Ok(!set.read().map_err(|_| lock_poisoned())?.contains(&entity.name))
    }
}

#[async_trait]
impl PermissionOracle for StaticPermissions {
    async fn can_create(&self, _user: &str, entity: &EntityDefinition) -> Result<bool, AppError> {
        Self::allowed(&self.no_create, entity)
    }

    async fn can_read(&self, _user: &str, entity: &EntityDefinition, _record: &str) -> Result<bool, AppError> {
        Self::allowed(&self.no_read, entity)
    }

    async fn can_update(&self, _user: &str, entity: &EntityDefinition, _record: &str) -> Result<bool, AppError> {
        Self::allowed(&self.no_update, entity)
    }
}

#[derive(Default)]
pub struct InMemoryUsers {
    users: HashMap<String, UserContext>,
}

impl InMemoryUsers {
    pub fn new(users: impl IntoIterator<Item = UserContext>) -> Self {
        InMemoryUsers {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
        }
    }
}

#[async_trait]
impl UserStore for InMemoryUsers {
    async fn resolve(&self, user: &str) -> Result<Option<UserContext>, AppError> {
        Ok(self.users.get(user).cloned())
    }
}
