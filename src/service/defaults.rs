//! Initial values for new records from a field's configured default.
//!
//! A default is a literal, or a time expression `NOW`, `NOW + 3D`, `NOW - 1M`
//! (units Y, M, D, H, I for minutes). Literals wrapped in braces (`{NOW}`) are
//! read as expressions too.

use crate::config::{DefaultValueConfig, DisplayType, FieldDefinition};
use crate::service::DATETIME_FORMAT;
use chrono::{DateTime, Duration, Months, Utc};
use regex::Regex;
use serde_json::Value;

const NOW_EXPRESSION: &str = r"(?i)^\{?\s*NOW\s*(?:([+-])\s*(\d+)\s*([YMDHI]))?\s*\}?$";

/// Evaluated default of `field` at `now`, or `None` when it has none (or it does not evaluate).
pub fn evaluate_default(field: &FieldDefinition, now: DateTime<Utc>) -> Option<Value> {
    match field.default_value.as_ref()? {
        DefaultValueConfig::Expression { expression } => eval_expression(&field.name, expression, now),
        DefaultValueConfig::Literal(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            if s.starts_with('{') && s.ends_with('}') {
                return eval_expression(&field.name, s, now);
            }
            if field.display_type == DisplayType::Bool {
                let on = matches!(s.to_lowercase().as_str(), "t" | "true" | "y" | "yes" | "1");
                return Some(Value::String(if on { "T" } else { "F" }.into()));
            }
            Some(Value::String(s.to_string()))
        }
    }
}

fn eval_expression(field: &str, expression: &str, now: DateTime<Utc>) -> Option<Value> {
    let re = match Regex::new(NOW_EXPRESSION) {
        Ok(re) => re,
        Err(e) => {
            tracing::warn!(error = %e, "default expression pattern");
            return None;
        }
    };
    let Some(caps) = re.captures(expression.trim()) else {
        tracing::warn!(field = %field, expression = %expression, "unsupported default expression, ignored");
        return None;
    };
    let at = match (caps.get(1), caps.get(2), caps.get(3)) {
        (Some(sign), Some(amount), Some(unit)) => {
            let n: u32 = amount.as_str().parse().ok()?;
            shift(now, sign.as_str() == "-", n, unit.as_str())?
        }
        _ => now,
    };
    Some(Value::String(at.format(DATETIME_FORMAT).to_string()))
}

fn shift(now: DateTime<Utc>, back: bool, n: u32, unit: &str) -> Option<DateTime<Utc>> {
    let months = |m: u32| {
        if back {
            now.checked_sub_months(Months::new(m))
        } else {
            now.checked_add_months(Months::new(m))
        }
    };
    let span = |d: Duration| {
        if back {
            now.checked_sub_signed(d)
        } else {
            now.checked_add_signed(d)
        }
    };
    match unit.to_ascii_uppercase().as_str() {
        "Y" => months(n.checked_mul(12)?),
        "M" => months(n),
        "D" => span(Duration::days(n.into())),
        "H" => span(Duration::hours(n.into())),
        "I" => span(Duration::minutes(n.into())),
        _ => None,
    }
}

/// Cut a default to the character length of the field's date/datetime format pattern.
pub fn truncate_to_format(value: Value, format_len: usize) -> Value {
    match value {
        Value::String(s) if s.chars().count() > format_len => Value::String(s.chars().take(format_len).collect()),
        other => other,
    }
}
