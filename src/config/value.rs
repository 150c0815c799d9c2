//! Tagged configuration values and their provenance.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A configuration value as read from any layer.
///
/// Extensions are stored as `Value`s so callers can match exhaustively
/// instead of casting from an untyped map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
}

impl Value {
    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "mapping",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Convert a parsed JSON/YAML value. `null` means "not specified" and
    /// yields `None`; nulls inside lists and mappings are dropped.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::Bool(b) => Some(Value::Boolean(b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Value::Integer(i)),
                None => n.as_f64().map(Value::Float),
            },
            serde_json::Value::String(s) => Some(Value::String(s)),
            serde_json::Value::Array(items) => Some(Value::List(
                items.into_iter().filter_map(Value::from_json).collect(),
            )),
            serde_json::Value::Object(map) => Some(Value::Map(
                map.into_iter()
                    .filter_map(|(k, v)| Value::from_json(v).map(|v| (k, v)))
                    .collect(),
            )),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::List(_) | Value::Map(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                write!(f, "{}", json)
            }
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// Source layer a value came from, ordered lowest to highest precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
    /// Structured config file (lowest priority)
    File = 0,
    /// `MYAPP_*` environment variables
    Environment = 1,
    /// Command-line flags (highest priority)
    Flag = 2,
}

impl Layer {
    /// Layers in the order the merger consults them.
    pub const PRECEDENCE: [Layer; 3] = [Layer::Flag, Layer::Environment, Layer::File];
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::File => write!(f, "file"),
            Layer::Environment => write!(f, "environment"),
            Layer::Flag => write!(f, "flag"),
        }
    }
}

/// An untyped value tagged with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RawValue {
    pub value: Value,
    pub layer: Layer,
    /// Whether the value was explicitly supplied. Flags with only their
    /// declared default are never set.
    pub explicitly_set: bool,
    /// Declared default, only carried by flag values.
    pub default: Option<Value>,
}

impl RawValue {
    pub fn file(value: Value) -> Self {
        Self {
            value,
            layer: Layer::File,
            explicitly_set: true,
            default: None,
        }
    }

    pub fn env(value: impl Into<String>) -> Self {
        Self {
            value: Value::String(value.into()),
            layer: Layer::Environment,
            explicitly_set: true,
            default: None,
        }
    }

    pub fn flag(value: Value, default: Value, explicitly_set: bool) -> Self {
        Self {
            value,
            layer: Layer::Flag,
            explicitly_set,
            default: Some(default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_drops_nulls() {
        let value = Value::from_json(json!({"a": 1, "b": null, "c": [true, null]})).unwrap();
        let map = value.as_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["a"], Value::Integer(1));
        assert_eq!(map["c"], Value::List(vec![Value::Boolean(true)]));
        assert!(Value::from_json(json!(null)).is_none());
    }

    #[test]
    fn test_from_json_preserves_key_order() {
        let value = Value::from_json(
            serde_yaml::from_str::<serde_json::Value>("zeta: 1\nalpha: 2\n").unwrap(),
        )
        .unwrap();
        let keys: Vec<&String> = value.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_float_is_kept() {
        assert_eq!(Value::from_json(json!(0.5)), Some(Value::Float(0.5)));
    }

    #[test]
    fn test_untagged_serialization() {
        let mut map = IndexMap::new();
        map.insert("team".to_string(), Value::from("platform"));
        map.insert("ttl".to_string(), Value::from(300i64));
        let json = serde_json::to_value(Value::Map(map)).unwrap();
        assert_eq!(json, json!({"team": "platform", "ttl": 300}));
    }

    #[test]
    fn test_display_quotes_strings() {
        assert_eq!(Value::from("").to_string(), "\"\"");
        assert_eq!(Value::from(8080i64).to_string(), "8080");
    }

    #[test]
    fn test_layer_precedence_order() {
        assert!(Layer::Flag > Layer::Environment);
        assert!(Layer::Environment > Layer::File);
        assert_eq!(Layer::PRECEDENCE[0], Layer::Flag);
    }
}
