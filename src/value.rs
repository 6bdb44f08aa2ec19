//! The document value type for inventory payloads.
//!
//! Host `vars` and group `data` are arbitrarily-nested JSON-shaped
//! documents. `Value` covers that shape as a tagged union, with the
//! mapping variant keeping insertion order so payloads round-trip
//! byte-for-byte through the store and back out to consumers.

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An ordered document value.
///
/// # Examples
///
/// ```
/// use roster::Value;
///
/// let mut vars = Value::map();
/// vars.insert("ansible_host", Value::from("10.0.0.5"));
/// vars.insert("port", Value::from(22));
///
/// assert_eq!(vars.get("port"), Some(&Value::Int(22)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    /// Key/value entries in insertion order.
    Mapping(Vec<(String, Value)>),
}

impl Value {
    /// Creates an empty mapping.
    #[must_use]
    pub const fn map() -> Self {
        Self::Mapping(Vec::new())
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_mapping(&self) -> bool {
        matches!(self, Self::Mapping(_))
    }

    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(String, Value)]> {
        match self {
            Self::Mapping(v) => Some(v),
            _ => None,
        }
    }

    /// Looks up a top-level key; `None` for non-mappings.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Mapping(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Inserts or replaces a top-level key.
    ///
    /// A non-mapping receiver is first reset to an empty mapping, so the
    /// entry always lands.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        if !self.is_mapping() {
            *self = Self::map();
        }
        let Self::Mapping(entries) = self else {
            unreachable!("receiver was just reset to a mapping");
        };
        let key = key.into();
        match entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => entries.push((key, value)),
        }
    }

    /// Removes a top-level key, returning the removed value if present.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let Self::Mapping(entries) = self else {
            return None;
        };
        let idx = entries.iter().position(|(k, _)| k == key)?;
        Some(entries.remove(idx).1)
    }

    /// Returns a human-readable type name.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
        }
    }

    /// Converts into a plain `serde_json::Value` for the JSON tool boundary.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(v) => serde_json::Value::Bool(*v),
            Self::Int(v) => serde_json::Value::from(*v),
            Self::Float(v) => serde_json::Value::from(*v),
            Self::String(v) => serde_json::Value::String(v.clone()),
            Self::Sequence(vs) => {
                serde_json::Value::Array(vs.iter().map(Value::to_json).collect())
            }
            Self::Mapping(entries) => {
                let mut out = serde_json::Map::new();
                for (k, v) in entries {
                    out.insert(k.clone(), v.to_json());
                }
                serde_json::Value::Object(out)
            }
        }
    }

    /// Builds a `Value` from a plain `serde_json::Value`.
    ///
    /// Numbers that fit `i64` become `Int`; everything else numeric
    /// becomes `Float`.
    #[must_use]
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(v) => Self::Bool(*v),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    Self::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(v) => Self::String(v.clone()),
            serde_json::Value::Array(vs) => {
                Self::Sequence(vs.iter().map(Self::from_json).collect())
            }
            serde_json::Value::Object(obj) => Self::Mapping(
                obj.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Renders the value as indented JSON, the shape the inventory CLI
    /// prints for consumers.
    #[must_use]
    pub fn to_json_pretty(&self) -> String {
        format!("{:#}", self.to_json())
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Sequence(v)
    }
}

impl FromIterator<(String, Value)> for Value {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self::Mapping(iter.into_iter().collect())
    }
}

// Serialized as plain JSON, not as an externally-tagged enum: stored
// documents and wire payloads are ordinary JSON objects.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
            Self::String(v) => serializer.serialize_str(v),
            Self::Sequence(vs) => {
                let mut seq = serializer.serialize_seq(Some(vs.len()))?;
                for v in vs {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Self::Mapping(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a JSON-shaped document value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Int(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::Float(v as f64), Value::Int))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Float(v))
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
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut out = Vec::new();
        while let Some(v) = seq.next_element()? {
            out.push(v);
        }
        Ok(Value::Sequence(out))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut entries: Vec<(String, Value)> = Vec::new();
        while let Some((k, v)) = map.next_entry::<String, Value>()? {
            match entries.iter_mut().find(|(existing, _)| *existing == k) {
                Some((_, slot)) => *slot = v,
                None => entries.push((k, v)),
            }
        }
        Ok(Value::Mapping(entries))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_insert_get() {
        let mut vars = Value::map();
        vars.insert("port", Value::from(80));
        vars.insert("host", Value::from("localhost"));

        assert_eq!(vars.get("port"), Some(&Value::Int(80)));
        assert_eq!(vars.get("host").and_then(Value::as_str), Some("localhost"));
        assert_eq!(vars.get("missing"), None);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut vars = Value::map();
        vars.insert("a", Value::from(1));
        vars.insert("b", Value::from(2));
        vars.insert("a", Value::from(3));

        let entries = vars.as_mapping().unwrap();
        assert_eq!(entries.len(), 2);
        // Replacement keeps the original position.
        assert_eq!(entries[0], ("a".to_string(), Value::Int(3)));
    }

    #[test]
    fn test_insert_resets_non_mapping() {
        let mut v = Value::Null;
        v.insert("key", Value::from(true));
        assert_eq!(v.get("key"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_remove() {
        let mut vars = Value::map();
        vars.insert("a", Value::from(1));
        assert_eq!(vars.remove("a"), Some(Value::Int(1)));
        assert_eq!(vars.remove("a"), None);
        assert_eq!(Value::Null.clone().remove("a"), None);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::Bool(true).type_name(), "bool");
        assert_eq!(Value::Int(1).type_name(), "int");
        assert_eq!(Value::Float(1.5).type_name(), "float");
        assert_eq!(Value::from("x").type_name(), "string");
        assert_eq!(Value::Sequence(vec![]).type_name(), "sequence");
        assert_eq!(Value::map().type_name(), "mapping");
    }

    #[test]
    fn test_as_float_widens_int() {
        assert_eq!(Value::Int(3).as_float(), Some(3.0));
        assert_eq!(Value::Bool(true).as_float(), None);
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let mut doc = Value::map();
        doc.insert("name", Value::from("localhost"));
        doc.insert("ports", Value::Sequence(vec![Value::from(22), Value::from(80)]));

        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"name":"localhost","ports":[22,80]}"#);
    }

    #[test]
    fn test_deserialize_preserves_key_order() {
        let doc: Value = serde_json::from_str(r#"{"z":1,"a":2,"m":3}"#).unwrap();
        let keys: Vec<&str> = doc
            .as_mapping()
            .unwrap()
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_round_trip_nested() {
        let raw = r#"{"vars":{"ssh":{"port":22,"user":"admin"},"tags":["db",null,true],"ratio":0.5}}"#;
        let doc: Value = serde_json::from_str(raw).unwrap();
        let back = serde_json::to_string(&doc).unwrap();
        assert_eq!(raw, back);
    }

    #[test]
    fn test_json_conversion_round_trip() {
        let json: serde_json::Value =
            serde_json::json!({"a": 1, "b": [true, "x"], "c": {"d": null}});
        let value = Value::from_json(&json);
        assert_eq!(value.to_json(), json);
    }

    #[test]
    fn test_large_u64_becomes_float() {
        let doc: Value = serde_json::from_str("18446744073709551615").unwrap();
        assert!(matches!(doc, Value::Float(_)));
    }

    #[test]
    fn test_display_and_pretty() {
        let mut doc = Value::map();
        doc.insert("port", Value::from(80));
        assert_eq!(doc.to_string(), r#"{"port":80}"#);
        assert!(doc.to_json_pretty().contains("\n"));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let doc: Value = serde_json::from_str(r#"{"a":1,"a":2}"#).unwrap();
        assert_eq!(doc.get("a"), Some(&Value::Int(2)));
        assert_eq!(doc.as_mapping().unwrap().len(), 1);
    }
}
