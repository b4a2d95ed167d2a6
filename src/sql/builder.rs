//! Builds the single-row projection SELECT used to load a record for a form.

use crate::config::{DisplayType, EntityDefinition, FieldDefinition, MetadataRegistry, MODIFIED_ON};
use std::collections::HashSet;

const MAIN_ALIAS: &str = "main";
const REF_ALIAS: &str = "r";

/// Quote identifier for PostgreSQL (safe: only from config).
fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// Full qualified table name.
fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quoted(schema), quoted(table))
}

/// Result key holding the display label joined in for a reference field.
pub fn label_key(field: &str) -> String {
    format!("&{}", field)
}

/// A projection SELECT. The record id is its only parameter (`$1`).
#[derive(Clone, Debug, Default)]
pub struct QueryBuf {
    pub sql: String,
    /// Result keys in select order.
    pub columns: Vec<String>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf::default()
    }
}

/// Numbers and custom enums (schema.typename) come back as `::text`: the exact digits
/// survive and column types the driver cannot decode (numeric, money) still read.
fn column_expr(alias: &str, field: &FieldDefinition) -> String {
    let as_text = match field.display_type {
        DisplayType::Number | DisplayType::Decimal => true,
        _ => field.pg_type.as_deref().is_some_and(|t| t.contains('.')),
    };
    if as_text {
        format!("{}.{}::text", alias, quoted(&field.column))
    } else {
        format!("{}.{}", alias, quoted(&field.column))
    }
}

/// `$1` with the primary key's cast so text-bound ids compare against uuid/int columns.
fn pk_placeholder(entity: &EntityDefinition) -> String {
    let pg_type = entity
        .field(&entity.primary_field)
        .and_then(|f| f.pg_type.as_deref());
    match pg_type {
        Some(t) => format!("$1::{}", t),
        None => "$1".to_string(),
    }
}

/// Scalar subquery fetching the referenced record's name field, or None when the target has no name field.
fn reference_label_expr(registry: &MetadataRegistry, field: &FieldDefinition) -> Option<String> {
    let target = registry.entity(field.reference_entity.as_deref()?)?;
    let name_field = target.field(target.name_field.as_deref()?)?;
    let target_pk = target.field(&target.primary_field)?;
    Some(format!(
        "(SELECT {}.{}::text FROM {} {} WHERE {}.{} = {}.{})",
        REF_ALIAS,
        quoted(&name_field.column),
        qualified_table(&target.schema_name, &target.table_name),
        REF_ALIAS,
        REF_ALIAS,
        quoted(&target_pk.column),
        MAIN_ALIAS,
        quoted(&field.column),
    ))
}

/// SELECT exactly the named fields of one row by primary key. Caller binds the id as `$1`.
///
/// Names starting with `$` (divider and other markers) and names missing from the
/// schema are skipped. Generic reference fields get an extra `&field` label column;
/// a `modifiedOn` column is appended when the entity has one.
pub fn select_projection(registry: &MetadataRegistry, entity: &EntityDefinition, fields: &[&str]) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut select_parts: Vec<String> = Vec::new();

    let mut push = |key: String, expr: String, q: &mut QueryBuf| {
        if seen.insert(key.clone()) {
            select_parts.push(format!("{} AS {}", expr, quoted(&key)));
            q.columns.push(key);
        }
    };

    for name in fields {
        if name.starts_with('$') {
            continue;
        }
        let Some(field) = entity.field(name) else { continue };
        if field.display_type == DisplayType::Reference {
            if let Some(expr) = reference_label_expr(registry, field) {
                push(label_key(name), expr, &mut q);
            }
        }
        push(field.name.clone(), column_expr(MAIN_ALIAS, field), &mut q);
    }
    if let Some(field) = entity.field(MODIFIED_ON) {
        push(field.name.clone(), column_expr(MAIN_ALIAS, field), &mut q);
    }
    if q.columns.is_empty() {
        if let Some(field) = entity.field(&entity.primary_field) {
            push(field.name.clone(), column_expr(MAIN_ALIAS, field), &mut q);
        }
    }

    let pk_column = entity
        .field(&entity.primary_field)
        .map(|f| f.column.as_str())
        .unwrap_or(entity.primary_field.as_str());
    q.sql = format!(
        "SELECT {} FROM {} {} WHERE {}.{} = {}",
        select_parts.join(", "),
        qualified_table(&entity.schema_name, &entity.table_name),
        MAIN_ALIAS,
        MAIN_ALIAS,
        quoted(pk_column),
        pk_placeholder(entity),
    );
    q
}
