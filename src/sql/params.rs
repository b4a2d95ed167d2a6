//! Convert serde_json::Value to a value sqlx can bind.

use serde_json::Value;
use sqlx::encode::{Encode, IsNull};
use sqlx::postgres::{PgTypeInfo, Postgres};
use sqlx::Database;

/// A JSON value bound as a PostgreSQL parameter. Scalars are sent as text and
/// cast by the placeholder (`$1::uuid`), so one bind type covers every column.
#[derive(Clone, Debug)]
pub enum PgBindValue {
    Null,
    Text(String),
    Json(Value),
}

impl From<&Value> for PgBindValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Null => PgBindValue::Null,
            Value::Bool(b) => PgBindValue::Text(b.to_string()),
            Value::Number(n) => PgBindValue::Text(n.to_string()),
            Value::String(s) => PgBindValue::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => PgBindValue::Json(v.clone()),
        }
    }
}

impl<'q> Encode<'q, Postgres> for PgBindValue {
    fn encode_by_ref(
        &self,
        buf: &mut <Postgres as Database>::ArgumentBuffer<'q>,
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        Ok(match self {
            PgBindValue::Null => <Option<&str> as Encode<Postgres>>::encode_by_ref(&None, buf)?,
            PgBindValue::Text(s) => {
                let s_ref: &str = s.as_str();
                <&str as Encode<Postgres>>::encode_by_ref(&s_ref, buf)?
            }
            PgBindValue::Json(v) => {
                let text = v.to_string();
                <&str as Encode<Postgres>>::encode_by_ref(&text.as_str(), buf)?
            }
        })
    }
}

impl sqlx::Type<Postgres> for PgBindValue {
    fn type_info() -> PgTypeInfo {
        PgTypeInfo::with_name("TEXT")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scalars_bind_as_text() {
        assert!(matches!(PgBindValue::from(&json!(42)), PgBindValue::Text(ref s) if s == "42"));
        assert!(matches!(PgBindValue::from(&json!(true)), PgBindValue::Text(ref s) if s == "true"));
        assert!(matches!(PgBindValue::from(&json!(null)), PgBindValue::Null));
        assert!(matches!(PgBindValue::from(&json!({"a": 1})), PgBindValue::Json(_)));
    }
}
