//! Load metadata config from in-memory structs or from the _sys_* tables in DB.

use crate::config::resolved::{EntityDefinition, FieldDefinition, MetadataRegistry, PkType};
use crate::config::types::*;
use crate::config::{validate, FullConfig};
use crate::error::ConfigError;
use crate::store::qualified_sys_table;
use sqlx::PgPool;
use std::collections::HashMap;

/// Build the metadata registry from full config (validates first).
pub fn resolve(config: &FullConfig) -> Result<MetadataRegistry, ConfigError> {
    validate(config)?;

    let fields_by_entity: HashMap<&str, Vec<&FieldConfig>> = config.fields.iter().fold(HashMap::new(), |mut m, f| {
        m.entry(f.entity.as_str()).or_default().push(f);
        m
    });
    let slave_by_master: HashMap<&str, &str> = config
        .entities
        .iter()
        .filter_map(|e| e.master_entity.as_deref().map(|m| (m, e.name.as_str())))
        .collect();

    let mut entities = Vec::with_capacity(config.entities.len());
    for e in &config.entities {
        let entity_fields = fields_by_entity.get(e.name.as_str()).map(|v| v.as_slice()).unwrap_or(&[]);
        let pk_field = entity_fields
            .iter()
            .find(|f| f.name == e.primary_field)
            .ok_or_else(|| ConfigError::InvalidPrimaryField {
                entity: e.name.clone(),
                field: e.primary_field.clone(),
            })?;
        let fields: HashMap<String, FieldDefinition> = entity_fields
            .iter()
            .map(|f| (f.name.clone(), resolve_field(f)))
            .collect();

        entities.push(EntityDefinition {
            name: e.name.clone(),
            code: e.code,
            label: e.label.clone().unwrap_or_else(|| e.name.clone()),
            icon: e.icon.clone(),
            schema_name: e.schema.clone().unwrap_or_else(|| "public".into()),
            table_name: e.table.clone(),
            primary_field: e.primary_field.clone(),
            pk_type: infer_pk_type(pk_field.column_type.as_deref()),
            name_field: e.name_field.clone(),
            master_entity: e.master_entity.clone(),
            slave_entity: slave_by_master.get(e.name.as_str()).map(|s| s.to_string()),
            operations: e.operations.clone(),
            fields,
        });
    }

    Ok(MetadataRegistry::new(entities))
}

fn resolve_field(f: &FieldConfig) -> FieldDefinition {
    FieldDefinition {
        name: f.name.clone(),
        column: f.column.clone().unwrap_or_else(|| f.name.clone()),
        label: f.label.clone().unwrap_or_else(|| f.name.clone()),
        display_type: f.display_type,
        nullable: f.nullable,
        creatable: f.creatable,
        updatable: f.updatable,
        reference_entity: f.reference_entity.clone(),
        default_value: f.default.clone(),
        classification: f.classification.clone(),
        pg_type: f.column_type.as_deref().map(str::to_lowercase),
        ext: f.ext.clone(),
    }
}

fn infer_pk_type(column_type: Option<&str>) -> PkType {
    let type_lower = column_type.unwrap_or("text").to_lowercase();
    if type_lower.contains("uuid") {
        PkType::Uuid
    } else if type_lower.contains("bigserial") || type_lower.contains("bigint") {
        PkType::BigInt
    } else if type_lower.contains("serial") || type_lower.contains("integer") || type_lower.contains("int") {
        PkType::Int
    } else {
        PkType::Text
    }
}

/// Load full metadata config from the _sys_* tables. Tables must already exist (ensure_sys_tables).
pub async fn load_from_pool(pool: &PgPool) -> Result<FullConfig, ConfigError> {
    let entities = load_config_table::<EntityConfig>(pool, &qualified_sys_table("_sys_entities")).await?;
    let fields = load_config_table::<FieldConfig>(pool, &qualified_sys_table("_sys_fields")).await?;
    let pick_lists = load_config_table::<PickListConfig>(pool, &qualified_sys_table("_sys_picklists")).await?;
    let classifications =
        load_config_table::<ClassificationConfig>(pool, &qualified_sys_table("_sys_classifications")).await?;
    let classification_items =
        load_config_table::<ClassificationItemConfig>(pool, &qualified_sys_table("_sys_classification_items")).await?;

    Ok(FullConfig {
        entities,
        fields,
        pick_lists,
        classifications,
        classification_items,
    })
}

async fn load_config_table<T>(pool: &PgPool, table: &str) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let sql = format!("SELECT payload FROM {} ORDER BY id", table);
    tracing::debug!(sql = %sql, "query");
    let rows = sqlx::query_scalar::<_, serde_json::Value>(&sql)
        .fetch_all(pool)
        .await
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let value: T = serde_json::from_value(row).map_err(|e| ConfigError::Load(format!("{}: {}", table, e)))?;
        out.push(value);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> FullConfig {
        let entities: Vec<EntityConfig> = serde_json::from_value(json!([
            { "id": "1", "name": "Order", "code": 100, "table": "orders", "primary_field": "orderId", "label": "Orders" },
            { "id": "2", "name": "OrderLine", "code": 101, "table": "order_lines", "primary_field": "lineId", "master_entity": "Order" }
        ]))
        .unwrap();
        let fields: Vec<FieldConfig> = serde_json::from_value(json!([
            { "id": "f1", "entity": "Order", "name": "orderId", "type": "TEXT", "column": "order_id", "column_type": "uuid" },
            { "id": "f2", "entity": "Order", "name": "total", "type": "DECIMAL", "column_type": "NUMERIC" },
            { "id": "f3", "entity": "OrderLine", "name": "lineId", "type": "NUMBER", "column_type": "bigint" }
        ]))
        .unwrap();
        FullConfig {
            entities,
            fields,
            ..Default::default()
        }
    }

    #[test]
    fn resolves_master_slave_links() {
        let registry = resolve(&config()).unwrap();
        let order = registry.entity("Order").unwrap();
        assert_eq!(order.slave_entity.as_deref(), Some("OrderLine"));
        assert_eq!(order.master_entity, None);
        let line = registry.entity("OrderLine").unwrap();
        assert_eq!(line.master_entity.as_deref(), Some("Order"));
    }

    #[test]
    fn resolves_field_defaults_and_pk_types() {
        let registry = resolve(&config()).unwrap();
        let order = registry.entity("Order").unwrap();
        assert_eq!(order.pk_type, PkType::Uuid);
        assert_eq!(order.label, "Orders");
        assert_eq!(order.schema_name, "public");
        let id = order.field("orderId").unwrap();
        assert_eq!(id.column, "order_id");
        let total = order.field("total").unwrap();
        assert_eq!(total.column, "total");
        assert_eq!(total.label, "total");
        assert_eq!(total.pg_type.as_deref(), Some("numeric"));
        assert!(total.nullable && total.creatable && total.updatable);
        assert_eq!(registry.entity("OrderLine").unwrap().pk_type, PkType::BigInt);
    }

    #[test]
    fn unknown_entity_is_invalid_invocation() {
        let registry = resolve(&config()).unwrap();
        assert!(matches!(
            registry.get_entity("Nope"),
            Err(crate::error::AppError::InvalidInvocation(_))
        ));
    }
}
