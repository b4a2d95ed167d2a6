//! Case conversion for overlay keys: layouts stored as snake_case (`date_format`) reach the client as camelCase.

use serde_json::{Map, Value};

/// Convert a single identifier from snake_case to camelCase.
/// e.g. "date_format" -> "dateFormat", "open_level" -> "openLevel"
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in s.chars() {
        if c == '_' {
            capitalize_next = true;
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert all keys of a JSON object from snake_case to camelCase. Values are left as they are.
/// When two keys collide after conversion, the one already in camelCase wins.
pub fn object_keys_to_camel_case(obj: Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::with_capacity(obj.len());
    let mut converted = Vec::new();
    for (k, v) in obj {
        let camel = to_camel_case(&k);
        if camel == k {
            out.insert(k, v);
        } else {
            converted.push((camel, v));
        }
    }
    for (k, v) in converted {
        out.entry(k).or_insert(v);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snake_to_camel() {
        assert_eq!(to_camel_case("date_format"), "dateFormat");
        assert_eq!(to_camel_case("label"), "label");
        assert_eq!(to_camel_case("datetimeFormat"), "datetimeFormat");
    }

    #[test]
    fn object_keys_prefer_existing_camel() {
        let obj = json!({ "open_level": 1, "openLevel": 2, "hint_text": "x" });
        let Value::Object(map) = obj else { unreachable!() };
        let out = object_keys_to_camel_case(map);
        assert_eq!(out.get("openLevel"), Some(&json!(2)));
        assert_eq!(out.get("hintText"), Some(&json!("x")));
        assert_eq!(out.len(), 2);
    }
}
