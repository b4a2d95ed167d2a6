//! Turns stored values into what a form or view displays, by display type.

use crate::config::{DisplayType, FieldDefinition};
use crate::locale::Locale;
use crate::service::{OptionResolver, Record};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{json, Value};

/// Shown in place of an option or classification item that no longer exists.
pub const MISSING_REF: &str = "[DELETED]";

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse the timestamp shapes that come back from the database or config: RFC 3339,
/// ISO with or without `T` and fraction, or a bare date (midnight).
pub(crate) fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).naive_utc());
    }
    for f in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, f) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Split `-1234.50` into ("-", "1234", ".50"); None unless the text is a plain decimal number.
fn split_number(text: &str) -> Option<(&str, &str, &str)> {
    let (sign, rest) = match text.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", text),
    };
    let (digits, fraction) = match rest.find('.') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, ""),
    };
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(digits) || (!fraction.is_empty() && !all_digits(&fraction[1..])) {
        return None;
    }
    Some((sign, digits, fraction))
}

/// Literal text of a scalar (ids, numbers, text).
fn literal(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "t" | "true" | "y" | "yes" | "1"),
        _ => false,
    }
}

/// Thousands grouping on the integer part; the fraction is kept digit for digit.
/// Text that is not a plain decimal number comes back unchanged.
pub fn group_thousands(text: &str) -> String {
    let text = text.trim();
    let Some((sign, digits, fraction)) = split_number(text) else {
        return text.to_string();
    };
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{}{}{}", sign, grouped, fraction)
}

fn format_temporal(stored: &Value, format: &str) -> Value {
    let parsed = match stored {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|d| d.naive_utc()),
        _ => None,
    };
    match parsed {
        Some(t) => Value::String(t.format(format).to_string()),
        None => Value::String(literal(stored)),
    }
}

fn file_list(stored: &Value) -> Value {
    match stored {
        Value::Array(_) => stored.clone(),
        Value::String(s) if s.trim_start().starts_with('[') => {
            serde_json::from_str(s).unwrap_or_else(|_| json!([s]))
        }
        Value::String(s) => json!([s]),
        other => json!([other]),
    }
}

/// Type-dependent display conversion. Borrowing the option resolver keeps it a pure function of its inputs.
pub struct FieldValueWrapper<'a> {
    options: &'a dyn OptionResolver,
    locale: Locale,
}

impl<'a> FieldValueWrapper<'a> {
    pub fn new(options: &'a dyn OptionResolver, locale: Locale) -> Self {
        FieldValueWrapper { options, locale }
    }

    /// Wrapped value of `field` in `record`, or `None` when the record holds no value for it.
    pub fn wrap_field(&self, record: &Record, field: &FieldDefinition, is_view: bool) -> Option<Value> {
        let stored = record.get(&field.name)?;
        Some(self.wrap(stored, record.label(&field.name), field, is_view))
    }

    /// `label` is the joined display label, only used for generic references.
    pub fn wrap(&self, stored: &Value, label: Option<&str>, field: &FieldDefinition, is_view: bool) -> Value {
        match field.display_type {
            DisplayType::Picklist => {
                let id = literal(stored);
                if is_view {
                    Value::String(non_blank(self.options.option_label(&id)))
                } else {
                    Value::String(id)
                }
            }
            DisplayType::Classification => {
                let id = literal(stored);
                let name = non_blank(self.options.classification_name(&id));
                if is_view {
                    Value::String(name)
                } else {
                    json!([id, name])
                }
            }
            DisplayType::Reference => {
                let id = literal(stored);
                let label = label
                    .filter(|l| !l.trim().is_empty())
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("[{}]", id.to_uppercase()));
                json!([id, label, field.reference_entity.clone().unwrap_or_default()])
            }
            DisplayType::Number | DisplayType::Decimal => {
                let text = group_thousands(&literal(stored));
                if is_view {
                    Value::String(text)
                } else {
                    Value::String(text.replace(',', ""))
                }
            }
            DisplayType::Bool => Value::String(self.locale.bool_text(truthy(stored)).to_string()),
            DisplayType::Date => format_temporal(stored, DATE_FORMAT),
            DisplayType::Datetime => format_temporal(stored, DATETIME_FORMAT),
            DisplayType::Image | DisplayType::File => file_list(stored),
            DisplayType::Text
            | DisplayType::Ntext
            | DisplayType::Email
            | DisplayType::Url
            | DisplayType::Phone
            | DisplayType::Series => Value::String(literal(stored)),
        }
    }
}

fn non_blank(resolved: Option<String>) -> String {
    resolved
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| MISSING_REF.to_string())
}
