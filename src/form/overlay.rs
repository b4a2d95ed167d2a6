//! Open extension overlay merged onto a rendered field element.
//!
//! Keys are normalised to camelCase. Keys the builder owns are refused, known keys
//! must have the right shape for the element's type, anything else passes through.

use crate::case::object_keys_to_camel_case;
use crate::form::FieldElement;
use serde_json::{Map, Value};

/// Keys computed by the builder; an overlay can never set them.
pub const RESERVED_KEYS: [&str; 6] = ["field", "type", "readonly", "value", "options", "openLevel"];

/// Merge `overlay` onto `element`, overwriting label/nullable/format defaults.
pub fn merge_overlay(element: &mut FieldElement, overlay: &Map<String, Value>) {
    if overlay.is_empty() {
        return;
    }
    for (key, value) in object_keys_to_camel_case(overlay.clone()) {
        if RESERVED_KEYS.contains(&key.as_str()) {
            tracing::warn!(field = %element.field, key = %key, "reserved overlay key ignored");
            continue;
        }
        let accepted = match key.as_str() {
            "label" => match value {
                Value::String(s) => {
                    element.label = s;
                    true
                }
                _ => false,
            },
            "nullable" => match value {
                Value::Bool(b) => {
                    element.nullable = b;
                    true
                }
                _ => false,
            },
            "dateFormat" | "datetimeFormat" => set_format(element, &key, value),
            _ => {
                element.extra.insert(key.clone(), value);
                true
            }
        };
        if !accepted {
            tracing::warn!(
                field = %element.field,
                key = %key,
                display_type = element.display_type.name(),
                "overlay value has the wrong shape for this field, ignored"
            );
        }
    }
}

/// Divider extension keys: camelCased, reserved keys dropped. Dividers carry no shape-checked keys.
pub fn divider_extra(overlay: &Map<String, Value>) -> Map<String, Value> {
    object_keys_to_camel_case(overlay.clone())
        .into_iter()
        .filter(|(key, _)| {
            let reserved = RESERVED_KEYS.contains(&key.as_str());
            if reserved {
                tracing::warn!(key = %key, "reserved divider key ignored");
            }
            !reserved
        })
        .collect()
}

/// A format key only applies to its own type (`dateFormat` on DATE, `datetimeFormat` on DATETIME).
fn set_format(element: &mut FieldElement, key: &str, value: Value) -> bool {
    if element.display_type.format_key() != Some(key) {
        return false;
    }
    match (value, element.format_slot()) {
        (Value::String(s), Some(slot)) if !s.trim().is_empty() => {
            *slot = Some(s);
            true
        }
        _ => false,
    }
}
