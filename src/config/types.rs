//! Raw config types matching the JSON payloads stored in the _sys_* tables.

use crate::config::DisplayType;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Field name of the divider pseudo-element in a layout.
pub const DIVIDER: &str = "$DIVIDER$";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EntityConfig {
    pub id: String,
    pub name: String,
    pub code: i32,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    /// PostgreSQL schema of the data table. Defaults to `public`.
    #[serde(default)]
    pub schema: Option<String>,
    pub table: String,
    pub primary_field: String,
    /// Field whose text labels a record when another entity references it.
    #[serde(default)]
    pub name_field: Option<String>,
    /// Name of the master entity when this entity holds detail rows.
    #[serde(default)]
    pub master_entity: Option<String>,
    #[serde(default = "default_operations")]
    pub operations: Vec<String>,
}

fn default_operations() -> Vec<String> {
    vec!["create".into(), "read".into(), "update".into()]
}

#[derive(Clone, Debug, Serialize)]
pub enum DefaultValueConfig {
    Literal(String),
    Expression { expression: String },
}

impl<'de> Deserialize<'de> for DefaultValueConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = Value::deserialize(deserializer)?;
        match v {
            Value::String(s) => Ok(DefaultValueConfig::Literal(s)),
            Value::Bool(b) => Ok(DefaultValueConfig::Literal(b.to_string())),
            Value::Number(n) => Ok(DefaultValueConfig::Literal(n.to_string())),
            Value::Object(mut obj) => {
                if let Some(Value::String(s)) = obj.remove("expression") {
                    return Ok(DefaultValueConfig::Expression { expression: s });
                }
                if let Some(Value::String(s)) = obj.remove("value").or_else(|| obj.remove("literal")) {
                    return Ok(DefaultValueConfig::Literal(s));
                }
                Err(serde::de::Error::custom(format!(
                    "default must be a string, {{ \"expression\": \"...\" }}, or {{ \"value\": \"...\" }}; got object with keys: {:?}",
                    obj.keys().collect::<Vec<_>>()
                )))
            }
            other => Err(serde::de::Error::custom(format!(
                "default must be a string or {{ \"expression\": \"...\" }}; got {}",
                type_name_of_json(&other)
            ))),
        }
    }
}

pub(crate) fn type_name_of_json(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldConfig {
    pub id: String,
    /// Owning entity name.
    pub entity: String,
    pub name: String,
    /// Physical column; defaults to the field name.
    #[serde(default)]
    pub column: Option<String>,
    /// PostgreSQL type name (e.g. "uuid", "bigint", "numeric"). Drives id parsing and casts.
    #[serde(default)]
    pub column_type: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub display_type: DisplayType,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default = "default_true")]
    pub creatable: bool,
    #[serde(default = "default_true")]
    pub updatable: bool,
    #[serde(default)]
    pub reference_entity: Option<String>,
    #[serde(default)]
    pub default: Option<DefaultValueConfig>,
    /// Classification id for CLASSIFICATION fields.
    #[serde(default)]
    pub classification: Option<String>,
    /// Per-field extension overlay, merged onto every rendered element of this field.
    #[serde(default)]
    pub ext: Map<String, Value>,
}

fn default_true() -> bool {
    true
}

/// One option of a PICKLIST field.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PickListConfig {
    pub id: String,
    pub entity: String,
    pub field: String,
    pub text: String,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub seq: i32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassificationConfig {
    pub id: String,
    pub name: String,
    /// How many hierarchy levels the picker opens.
    #[serde(default = "default_open_level")]
    pub open_level: i32,
}

fn default_open_level() -> i32 {
    2
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassificationItemConfig {
    pub id: String,
    pub classification_id: String,
    #[serde(default)]
    pub parent: Option<String>,
    pub name: String,
}

/// Ordered field layout for one entity, optionally scoped to one user.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub id: String,
    pub entity: String,
    /// User id this layout belongs to; `None` is the shared layout.
    #[serde(default)]
    pub applies_to: Option<String>,
    #[serde(default)]
    pub elements: Vec<LayoutElement>,
}

/// One layout slot: a field name (or the divider marker) plus its open overlay keys.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LayoutElement {
    pub field: String,
    #[serde(flatten)]
    pub ext: Map<String, Value>,
}

impl LayoutElement {
    pub fn new(field: impl Into<String>) -> Self {
        LayoutElement {
            field: field.into(),
            ext: Map::new(),
        }
    }

    pub fn is_divider(&self) -> bool {
        self.field.eq_ignore_ascii_case(DIVIDER)
    }
}

/// All metadata config in one struct for in-memory loading.
#[derive(Clone, Debug, Default)]
pub struct FullConfig {
    pub entities: Vec<EntityConfig>,
    pub fields: Vec<FieldConfig>,
    pub pick_lists: Vec<PickListConfig>,
    pub classifications: Vec<ClassificationConfig>,
    pub classification_items: Vec<ClassificationItemConfig>,
}
