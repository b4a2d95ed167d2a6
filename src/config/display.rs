//! Closed set of field display types. Every per-type behavior in the crate is an
//! exhaustive `match` over this enum, so adding a variant fails to compile until
//! each table handles it.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DisplayType {
    Text,
    Ntext,
    Email,
    Url,
    Phone,
    Number,
    Decimal,
    Date,
    Datetime,
    Bool,
    /// Single-select over a configured option list.
    Picklist,
    /// Reference into a hierarchical classification.
    Classification,
    /// Reference to a record of another entity.
    Reference,
    /// Auto-sequence number assigned on save.
    Series,
    Image,
    File,
}

impl DisplayType {
    /// Upper-case name as it appears in rendered elements.
    pub fn name(&self) -> &'static str {
        match self {
            DisplayType::Text => "TEXT",
            DisplayType::Ntext => "NTEXT",
            DisplayType::Email => "EMAIL",
            DisplayType::Url => "URL",
            DisplayType::Phone => "PHONE",
            DisplayType::Number => "NUMBER",
            DisplayType::Decimal => "DECIMAL",
            DisplayType::Date => "DATE",
            DisplayType::Datetime => "DATETIME",
            DisplayType::Bool => "BOOL",
            DisplayType::Picklist => "PICKLIST",
            DisplayType::Classification => "CLASSIFICATION",
            DisplayType::Reference => "REFERENCE",
            DisplayType::Series => "SERIES",
            DisplayType::Image => "IMAGE",
            DisplayType::File => "FILE",
        }
    }

    /// Client-side format pattern used when the layout gives no override.
    pub fn default_format(&self) -> Option<&'static str> {
        match self {
            DisplayType::Date => Some("yyyy-MM-dd"),
            DisplayType::Datetime => Some("yyyy-MM-dd HH:mm:ss"),
            _ => None,
        }
    }

    /// Element key carrying the format pattern (`dateFormat` / `datetimeFormat`).
    pub fn format_key(&self) -> Option<&'static str> {
        match self {
            DisplayType::Date => Some("dateFormat"),
            DisplayType::Datetime => Some("datetimeFormat"),
            _ => None,
        }
    }
}
