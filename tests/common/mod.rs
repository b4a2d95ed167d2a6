#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use form_model_sdk::config::{
    ClassificationConfig, ClassificationItemConfig, EntityConfig, FieldConfig, LayoutConfig, LayoutElement,
    PickListConfig,
};
use form_model_sdk::service::{
    Department, InMemoryLayouts, InMemoryRecords, InMemoryUsers, Record, StaticPermissions, UserContext,
};
use form_model_sdk::{resolve, FormsBuilder, FullConfig, Locale, OptionCatalog};
use serde_json::{json, Value};
use std::sync::Arc;

pub const ANN: &str = "u1";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
}

pub fn config() -> FullConfig {
    let entities: Vec<EntityConfig> = serde_json::from_value(json!([
        { "id": "e1", "name": "User", "code": 1, "table": "users", "primary_field": "userId", "name_field": "fullName" },
        { "id": "e2", "name": "Contact", "code": 200, "label": "Contacts", "schema": "crm", "table": "contacts", "primary_field": "contactId" },
        { "id": "e3", "name": "Order", "code": 300, "label": "Orders", "table": "orders", "primary_field": "orderId" },
        { "id": "e4", "name": "OrderLine", "code": 301, "label": "Order lines", "icon": "list", "table": "order_lines", "primary_field": "lineId", "master_entity": "Order" }
    ]))
    .unwrap();
    let fields: Vec<FieldConfig> = serde_json::from_value(json!([
        { "id": "u1", "entity": "User", "name": "userId", "type": "TEXT", "column": "user_id" },
        { "id": "u2", "entity": "User", "name": "fullName", "type": "TEXT", "column": "full_name" },

        { "id": "c1", "entity": "Contact", "name": "contactId", "type": "TEXT", "column": "contact_id", "creatable": false, "updatable": false },
        { "id": "c2", "entity": "Contact", "name": "name", "type": "TEXT", "label": "Name", "nullable": false },
        { "id": "c3", "entity": "Contact", "name": "status", "type": "PICKLIST", "label": "Status" },
        { "id": "c4", "entity": "Contact", "name": "createdOn", "type": "DATETIME", "label": "Created", "column": "created_on", "creatable": false, "updatable": false },
        { "id": "c5", "entity": "Contact", "name": "modifiedOn", "type": "DATETIME", "column": "modified_on", "creatable": false, "updatable": false },
        { "id": "c6", "entity": "Contact", "name": "amount", "type": "DECIMAL", "column_type": "numeric" },
        { "id": "c7", "entity": "Contact", "name": "visits", "type": "NUMBER", "column_type": "bigint" },
        { "id": "c8", "entity": "Contact", "name": "active", "type": "BOOL", "default": true },
        { "id": "c9", "entity": "Contact", "name": "owningUser", "type": "REFERENCE", "column": "owning_user", "reference_entity": "User", "creatable": false },
        { "id": "c10", "entity": "Contact", "name": "owningDept", "type": "REFERENCE", "column": "owning_dept", "reference_entity": "User", "creatable": false },
        { "id": "c11", "entity": "Contact", "name": "region", "type": "CLASSIFICATION", "classification": "region" },
        { "id": "c12", "entity": "Contact", "name": "due", "type": "DATE", "default": { "expression": "NOW + 3D" } },
        { "id": "c13", "entity": "Contact", "name": "code", "type": "SERIES", "creatable": true, "updatable": false },
        { "id": "c14", "entity": "Contact", "name": "phone", "type": "PHONE", "ext": { "placeholder": "+1 555" } },

        { "id": "o1", "entity": "Order", "name": "orderId", "type": "TEXT", "column": "order_id" },
        { "id": "o2", "entity": "Order", "name": "title", "type": "TEXT" },

        { "id": "l1", "entity": "OrderLine", "name": "lineId", "type": "TEXT", "column": "line_id" },
        { "id": "l2", "entity": "OrderLine", "name": "product", "type": "TEXT" },
        { "id": "l3", "entity": "OrderLine", "name": "qty", "type": "NUMBER", "column_type": "integer" }
    ]))
    .unwrap();
    let pick_lists: Vec<PickListConfig> = serde_json::from_value(json!([
        { "id": "A", "entity": "Contact", "field": "status", "text": "Active", "default": true, "seq": 1 },
        { "id": "B", "entity": "Contact", "field": "status", "text": "Blocked", "seq": 2 }
    ]))
    .unwrap();
    let classifications: Vec<ClassificationConfig> =
        serde_json::from_value(json!([{ "id": "region", "name": "Region", "open_level": 3 }])).unwrap();
    let classification_items: Vec<ClassificationItemConfig> = serde_json::from_value(json!([
        { "id": "asia", "classification_id": "region", "name": "Asia" },
        { "id": "cn", "classification_id": "region", "parent": "asia", "name": "China" }
    ]))
    .unwrap();
    FullConfig {
        entities,
        fields,
        pick_lists,
        classifications,
        classification_items,
    }
}

pub fn layout(entity: &str, fields: &[&str]) -> LayoutConfig {
    LayoutConfig {
        id: format!("layout-{}", entity),
        entity: entity.to_string(),
        applies_to: None,
        elements: fields.iter().map(|f| LayoutElement::new(*f)).collect(),
    }
}

pub fn element(field: &str, ext: Value) -> LayoutElement {
    let mut el = LayoutElement::new(field);
    if let Value::Object(m) = ext {
        el.ext = m;
    }
    el
}

pub struct Harness {
    pub builder: FormsBuilder,
    pub layouts: Arc<InMemoryLayouts>,
    pub records: Arc<InMemoryRecords>,
    pub permissions: Arc<StaticPermissions>,
}

pub fn harness() -> Harness {
    harness_with_locale(Locale::En)
}

pub fn harness_with_locale(locale: Locale) -> Harness {
    let config = config();
    let metadata = Arc::new(resolve(&config).unwrap());
    let layouts = Arc::new(InMemoryLayouts::new());
    let records = Arc::new(InMemoryRecords::new());
    let permissions = Arc::new(StaticPermissions::allow_all());
    let users = InMemoryUsers::new([UserContext {
        id: ANN.into(),
        full_name: "Ann Lee".into(),
        department: Some(Department {
            id: "d1".into(),
            name: "Sales".into(),
        }),
    }]);
    let builder = FormsBuilder::new(
        metadata,
        permissions.clone(),
        layouts.clone(),
        Arc::new(OptionCatalog::from_config(&config)),
        records.clone(),
        Arc::new(users),
    )
    .with_locale(locale);
    Harness {
        builder,
        layouts,
        records,
        permissions,
    }
}

/// Contact `c-1` as stored: status B, decimal amount, boolean true, owner with joined label.
pub fn contact_record() -> Record {
    Record::new()
        .with("contactId", json!("c-1"))
        .with("name", json!("Ann's client"))
        .with("status", json!("B"))
        .with("createdOn", json!("2024-03-01T09:00:00Z"))
        .with("modifiedOn", json!("2024-03-01T10:00:00Z"))
        .with("amount", json!("1234567.50"))
        .with("visits", json!(1234567))
        .with("active", json!(true))
        .with("owningUser", json!("u1"))
        .with("&owningUser", json!("Ann Lee"))
        .with("region", json!("cn"))
        .with("due", json!("2024-07-01"))
        .with("code", json!("C-0001"))
}
