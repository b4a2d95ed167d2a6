//! Per-display-type tables: what an element gets attached, and what a new record starts with.

use crate::config::{DisplayType, FieldDefinition};
use crate::form::FieldElement;
use crate::locale::Locale;
use crate::service::{evaluate_default, truncate_to_format, OptionResolver};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Attach type-specific data to `element`. Returns the character length of the
/// date/datetime format in effect, used to cut default values down to it.
pub fn augment(element: &mut FieldElement, entity: &str, field: &FieldDefinition, options: &dyn OptionResolver) -> Option<usize> {
    match field.display_type {
        DisplayType::Picklist => {
            element.options = Some(options.list_options(entity, field));
            None
        }
        DisplayType::Date | DisplayType::Datetime => {
            let default = field.display_type.default_format().unwrap_or_default();
            let slot = element.format_slot()?;
            let format = slot.get_or_insert_with(|| default.to_string());
            Some(format.chars().count())
        }
        DisplayType::Classification => {
            element.open_level = Some(options.open_level(field));
            None
        }
        DisplayType::Text
        | DisplayType::Ntext
        | DisplayType::Email
        | DisplayType::Url
        | DisplayType::Phone
        | DisplayType::Number
        | DisplayType::Decimal
        | DisplayType::Bool
        | DisplayType::Reference
        | DisplayType::Series
        | DisplayType::Image
        | DisplayType::File => None,
    }
}

/// Initial value of a creatable field on a new record.
pub fn creation_value(
    element: &FieldElement,
    field: &FieldDefinition,
    format_len: Option<usize>,
    locale: Locale,
    now: DateTime<Utc>,
) -> Option<Value> {
    match field.display_type {
        DisplayType::Picklist => element
            .options
            .as_ref()?
            .iter()
            .find(|o| o.default)
            .map(|o| Value::String(o.id.clone())),
        DisplayType::Series => Some(Value::String(locale.series_placeholder().to_string())),
        DisplayType::Date | DisplayType::Datetime => {
            let value = evaluate_default(field, now)?;
            Some(match format_len {
                Some(len) => truncate_to_format(value, len),
                None => value,
            })
        }
        DisplayType::Text
        | DisplayType::Ntext
        | DisplayType::Email
        | DisplayType::Url
        | DisplayType::Phone
        | DisplayType::Number
        | DisplayType::Decimal
        | DisplayType::Bool
        | DisplayType::Classification
        | DisplayType::Reference
        | DisplayType::Image
        | DisplayType::File => evaluate_default(field, now),
    }
}
