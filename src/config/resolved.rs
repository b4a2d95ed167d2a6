//! Resolved metadata: config validated and flattened for runtime lookups.

use crate::config::{DefaultValueConfig, DisplayType};
use crate::error::AppError;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const CREATED_ON: &str = "createdOn";
pub const MODIFIED_ON: &str = "modifiedOn";
pub const CREATED_BY: &str = "createdBy";
pub const MODIFIED_BY: &str = "modifiedBy";
pub const OWNING_USER: &str = "owningUser";
pub const OWNING_DEPT: &str = "owningDept";

/// Primary key type for parsing record ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PkType {
    Uuid,
    BigInt,
    Int,
    Text,
}

#[derive(Clone, Debug)]
pub struct FieldDefinition {
    pub name: String,
    pub column: String,
    pub label: String,
    pub display_type: DisplayType,
    pub nullable: bool,
    pub creatable: bool,
    pub updatable: bool,
    pub reference_entity: Option<String>,
    pub default_value: Option<DefaultValueConfig>,
    pub classification: Option<String>,
    /// PostgreSQL type name for casts (e.g. "numeric").
    pub pg_type: Option<String>,
    pub ext: Map<String, Value>,
}

impl FieldDefinition {
    /// Minimal definition for tests and programmatic registries: nullable, creatable, updatable.
    pub fn new(name: impl Into<String>, display_type: DisplayType) -> Self {
        let name = name.into();
        FieldDefinition {
            column: name.clone(),
            label: name.clone(),
            name,
            display_type,
            nullable: true,
            creatable: true,
            updatable: true,
            reference_entity: None,
            default_value: None,
            classification: None,
            pg_type: None,
            ext: Map::new(),
        }
    }
}

/// Label block for an entity as shown next to a related form.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDisplayMeta {
    pub entity: String,
    pub entity_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

#[derive(Clone, Debug)]
pub struct EntityDefinition {
    pub name: String,
    pub code: i32,
    pub label: String,
    pub icon: Option<String>,
    pub schema_name: String,
    pub table_name: String,
    pub primary_field: String,
    pub pk_type: PkType,
    pub name_field: Option<String>,
    pub master_entity: Option<String>,
    pub slave_entity: Option<String>,
    pub operations: Vec<String>,
    pub fields: HashMap<String, FieldDefinition>,
}

impl EntityDefinition {
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.get(name)
    }

    pub fn allows(&self, operation: &str) -> bool {
        self.operations.iter().any(|o| o == operation)
    }

    pub fn display_meta(&self) -> EntityDisplayMeta {
        EntityDisplayMeta {
            entity: self.name.clone(),
            entity_label: self.label.clone(),
            icon: self.icon.clone(),
        }
    }
}

/// Entity schema lookup. Immutable once resolved; shared behind an `Arc`.
#[derive(Clone, Debug, Default)]
pub struct MetadataRegistry {
    entities: HashMap<String, EntityDefinition>,
}

impl MetadataRegistry {
    pub fn new(entities: Vec<EntityDefinition>) -> Self {
        MetadataRegistry {
            entities: entities.into_iter().map(|e| (e.name.clone(), e)).collect(),
        }
    }

    pub fn entity(&self, name: &str) -> Option<&EntityDefinition> {
        self.entities.get(name)
    }

    /// Like `entity`, but an unknown name is a fault of the caller.
    pub fn get_entity(&self, name: &str) -> Result<&EntityDefinition, AppError> {
        self.entity(name)
            .ok_or_else(|| AppError::InvalidInvocation(format!("unknown entity: {}", name)))
    }

    pub fn entities(&self) -> impl Iterator<Item = &EntityDefinition> {
        self.entities.values()
    }
}
