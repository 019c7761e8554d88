//! Store value variants
//!
//! The constrained scalar type carried in attribute bags and bound into
//! statements. Conversions are explicit conversions only; nothing here
//! guesses a type from a string.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// A scalar value as stored in one cell of a row
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    Blob(Vec<u8>),
}

impl StoreValue {
    pub fn is_null(&self) -> bool {
        matches!(self, StoreValue::Null)
    }

    /// Variant name, used in hydration diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            StoreValue::Null => "null",
            StoreValue::Bool(_) => "bool",
            StoreValue::Int(_) => "int",
            StoreValue::Float(_) => "float",
            StoreValue::Text(_) => "text",
            StoreValue::Timestamp(_) => "timestamp",
            StoreValue::Uuid(_) => "uuid",
            StoreValue::Blob(_) => "blob",
        }
    }

    /// Project into JSON for serialization boundaries. Timestamps render
    /// as RFC 3339 text, blobs as lowercase hex.
    pub fn to_json(&self) -> JsonValue {
        match self {
            StoreValue::Null => JsonValue::Null,
            StoreValue::Bool(b) => JsonValue::Bool(*b),
            StoreValue::Int(i) => JsonValue::Number((*i).into()),
            StoreValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            StoreValue::Text(s) => JsonValue::String(s.clone()),
            StoreValue::Timestamp(ts) => JsonValue::String(ts.to_rfc3339()),
            StoreValue::Uuid(u) => JsonValue::String(u.to_string()),
            StoreValue::Blob(b) => JsonValue::String(hex::encode(b)),
        }
    }
}

impl fmt::Display for StoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreValue::Null => write!(f, "null"),
            StoreValue::Bool(b) => write!(f, "{}", b),
            StoreValue::Int(i) => write!(f, "{}", i),
            StoreValue::Float(x) => write!(f, "{}", x),
            StoreValue::Text(s) => write!(f, "{}", s),
            StoreValue::Timestamp(ts) => write!(f, "{}", ts.to_rfc3339()),
            StoreValue::Uuid(u) => write!(f, "{}", u),
            StoreValue::Blob(b) => write!(f, "0x{}", hex::encode(b)),
        }
    }
}

impl From<bool> for StoreValue {
    fn from(value: bool) -> Self {
        StoreValue::Bool(value)
    }
}

impl From<i32> for StoreValue {
    fn from(value: i32) -> Self {
        StoreValue::Int(value as i64)
    }
}

impl From<i64> for StoreValue {
    fn from(value: i64) -> Self {
        StoreValue::Int(value)
    }
}

impl From<u32> for StoreValue {
    fn from(value: u32) -> Self {
        StoreValue::Int(value as i64)
    }
}

impl From<f32> for StoreValue {
    fn from(value: f32) -> Self {
        StoreValue::Float(value as f64)
    }
}

impl From<f64> for StoreValue {
    fn from(value: f64) -> Self {
        StoreValue::Float(value)
    }
}

impl From<&str> for StoreValue {
    fn from(value: &str) -> Self {
        StoreValue::Text(value.to_string())
    }
}

impl From<String> for StoreValue {
    fn from(value: String) -> Self {
        StoreValue::Text(value)
    }
}

impl From<DateTime<Utc>> for StoreValue {
    fn from(value: DateTime<Utc>) -> Self {
        StoreValue::Timestamp(value)
    }
}

impl From<Uuid> for StoreValue {
    fn from(value: Uuid) -> Self {
        StoreValue::Uuid(value)
    }
}

impl From<Vec<u8>> for StoreValue {
    fn from(value: Vec<u8>) -> Self {
        StoreValue::Blob(value)
    }
}

impl From<&[u8]> for StoreValue {
    fn from(value: &[u8]) -> Self {
        StoreValue::Blob(value.to_vec())
    }
}

impl<T> From<Option<T>> for StoreValue
where
    T: Into<StoreValue>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => StoreValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn conversions_pick_the_right_variant() {
        assert_eq!(StoreValue::from(true), StoreValue::Bool(true));
        assert_eq!(StoreValue::from(42i32), StoreValue::Int(42));
        assert_eq!(StoreValue::from(42u32), StoreValue::Int(42));
        assert_eq!(StoreValue::from(2.5f64), StoreValue::Float(2.5));
        assert_eq!(
            StoreValue::from("hello"),
            StoreValue::Text("hello".to_string())
        );
        assert_eq!(
            StoreValue::from(vec![0xde, 0xad]),
            StoreValue::Blob(vec![0xde, 0xad])
        );
    }

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(StoreValue::from(None::<i64>), StoreValue::Null);
        assert_eq!(StoreValue::from(Some(7i64)), StoreValue::Int(7));
        assert!(StoreValue::Null.is_null());
        assert!(!StoreValue::Int(0).is_null());
    }

    #[test]
    fn json_projection_is_lossless_for_text_forms() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        assert_eq!(
            StoreValue::Timestamp(ts).to_json(),
            JsonValue::String("2024-03-01T12:00:00+00:00".to_string())
        );
        assert_eq!(
            StoreValue::Blob(vec![0xab, 0xcd]).to_json(),
            JsonValue::String("abcd".to_string())
        );
        assert_eq!(StoreValue::Null.to_json(), JsonValue::Null);
    }

    #[test]
    fn display_renders_blobs_as_hex() {
        assert_eq!(StoreValue::Blob(vec![0x0f, 0xf0]).to_string(), "0x0ff0");
        assert_eq!(StoreValue::Int(-3).to_string(), "-3");
    }
}
