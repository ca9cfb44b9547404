//! Dynamically-typed record values.
//!
//! Records in an inspected store have no fixed schema: a field can hold a
//! scalar, a nested array/object, or a binary payload (file upload, photo
//! blob). `Value` is the tagged union covering all of them. Binary payloads
//! carry metadata only; the inspector never touches the raw bytes.

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Metadata of a binary (file- or blob-like) value.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Default)]
pub struct BinaryInfo {
    /// Payload size in bytes.
    #[serde(default)]
    pub size: u64,

    /// MIME type; empty when the producer did not record one.
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,

    /// Original filename; empty for anonymous blobs.
    #[serde(rename = "name", default)]
    pub name_hint: String,
}

/// A single record value.
///
/// Object fields keep their original order, and two records in the same
/// collection are free to expose different field sets.
///
/// JSON mapping: a JSON object of the single-key shape
/// `{"$blob": {"size": …, "mimeType": …, "name": …}}` decodes to
/// `Value::Binary`; every other JSON form maps structurally.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Vec<(String, Value)>),
    Binary(BinaryInfo),
}

impl Value {
    /// Marker key wrapping binary metadata in the JSON mapping.
    pub const BLOB_KEY: &'static str = "$blob";

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Plain-text rendition, also used as the mixed-type sort key.
    ///
    /// Arrays flatten to their comma-joined elements; objects and binary
    /// values reduce to a type word since their contents are rendered through
    /// dedicated cell forms, not through this string.
    pub fn display_string(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => format_number(*n),
            Value::String(s) => s.clone(),
            Value::Array(items) => {
                let parts: Vec<String> = items.iter().map(Value::display_string).collect();
                parts.join(",")
            }
            Value::Object(_) => "Object".to_string(),
            Value::Binary(_) => "Blob".to_string(),
        }
    }
}

/// Formats a number without a trailing `.0` when it is integral.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Number(n) => serializer.serialize_f64(*n),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Object(fields) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Value::Binary(info) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(Self::BLOB_KEY, info)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a record value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v as f64))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::new();
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut fields: Vec<(String, Value)> = Vec::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            // Duplicate keys keep their first position, last value wins.
            if let Some(slot) = fields.iter_mut().find(|(k, _)| *k == key) {
                slot.1 = value;
            } else {
                fields.push((key, value));
            }
        }

        if let [(key, Value::Object(inner))] = fields.as_slice() {
            if key == Value::BLOB_KEY {
                return Ok(Value::Binary(binary_from_fields(inner)));
            }
        }
        Ok(Value::Object(fields))
    }
}

fn binary_from_fields(fields: &[(String, Value)]) -> BinaryInfo {
    let mut info = BinaryInfo::default();
    for (key, value) in fields {
        match (key.as_str(), value) {
            ("size", Value::Number(n)) => info.size = *n as u64,
            ("mimeType", Value::String(s)) => info.mime_type = s.clone(),
            ("name", Value::String(s)) => info.name_hint = s.clone(),
            _ => {}
        }
    }
    info
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_preserves_field_order() {
        let v: Value = serde_json::from_str(r#"{"z":1,"a":2,"m":3}"#).unwrap();
        let Value::Object(fields) = v else {
            panic!("expected object");
        };
        let keys: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_duplicate_key_keeps_position_last_value_wins() {
        let v: Value = serde_json::from_str(r#"{"a":1,"b":2,"a":3}"#).unwrap();
        let Value::Object(fields) = v else {
            panic!("expected object");
        };
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0], ("a".to_string(), Value::Number(3.0)));
        assert_eq!(fields[1], ("b".to_string(), Value::Number(2.0)));
    }

    #[test]
    fn test_blob_marker_decodes_to_binary() {
        let v: Value = serde_json::from_str(
            r#"{"$blob":{"size":2048,"mimeType":"image/png","name":"site.png"}}"#,
        )
        .unwrap();
        assert_eq!(
            v,
            Value::Binary(BinaryInfo {
                size: 2048,
                mime_type: "image/png".to_string(),
                name_hint: "site.png".to_string(),
            })
        );
    }

    #[test]
    fn test_blob_marker_fields_default_when_missing() {
        let v: Value = serde_json::from_str(r#"{"$blob":{"size":10}}"#).unwrap();
        let Value::Binary(info) = v else {
            panic!("expected binary");
        };
        assert_eq!(info.size, 10);
        assert!(info.mime_type.is_empty());
        assert!(info.name_hint.is_empty());
    }

    #[test]
    fn test_blob_marker_with_extra_keys_stays_object() {
        let v: Value = serde_json::from_str(r#"{"$blob":{"size":1},"other":true}"#).unwrap();
        assert!(matches!(v, Value::Object(_)));
    }

    #[test]
    fn test_blob_marker_with_scalar_payload_stays_object() {
        let v: Value = serde_json::from_str(r#"{"$blob":5}"#).unwrap();
        assert!(matches!(v, Value::Object(_)));
    }

    #[test]
    fn test_binary_serializes_as_blob_marker() {
        let v = Value::Binary(BinaryInfo {
            size: 7,
            mime_type: "application/pdf".to_string(),
            name_hint: "plan.pdf".to_string(),
        });
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"$blob": {"size": 7, "mimeType": "application/pdf", "name": "plan.pdf"}})
        );
    }

    #[test]
    fn test_round_trip_nested() {
        let text = r#"{"id":4,"tags":["a","b"],"meta":{"done":false,"note":null}}"#;
        let v: Value = serde_json::from_str(text).unwrap();
        let back = serde_json::to_string(&v).unwrap();
        let again: Value = serde_json::from_str(&back).unwrap();
        assert_eq!(v, again);
    }

    #[test]
    fn test_display_strings() {
        assert_eq!(Value::Null.display_string(), "null");
        assert_eq!(Value::Bool(true).display_string(), "true");
        assert_eq!(Value::Number(2.0).display_string(), "2");
        assert_eq!(Value::Number(2.5).display_string(), "2.5");
        assert_eq!(Value::Number(-3.0).display_string(), "-3");
        assert_eq!(
            Value::Array(vec![Value::Number(1.0), Value::Number(2.0)]).display_string(),
            "1,2"
        );
        assert_eq!(Value::Object(Vec::new()).display_string(), "Object");
    }
}
