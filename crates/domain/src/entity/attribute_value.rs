//! Typed attribute values attached to entities.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single typed attribute value.
///
/// Closed set of shapes a states payload can carry; maps keep their keys
/// ordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<AttributeValue>),
    Map(BTreeMap<String, AttributeValue>),
}

impl AttributeValue {
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for AttributeValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(value) => Self::Bool(value),
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(int) => Self::Int(int),
                None => number.as_f64().map_or(Self::Null, Self::Float),
            },
            serde_json::Value::String(value) => Self::String(value),
            serde_json::Value::Array(values) => {
                Self::List(values.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::String(value) => write!(f, "{value:?}"),
            Self::List(values) => {
                f.write_str("[")?;
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            Self::Map(map) => {
                f.write_str("{")?;
                for (idx, (key, value)) in map.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key:?}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_integer_json_number_to_int() {
        let val = AttributeValue::from(serde_json::json!(42));
        assert_eq!(val, AttributeValue::Int(42));
    }

    #[test]
    fn should_convert_fractional_json_number_to_float() {
        let val = AttributeValue::from(serde_json::json!(21.5));
        assert_eq!(val, AttributeValue::Float(21.5));
    }

    #[test]
    fn should_convert_nested_json_structures() {
        let val = AttributeValue::from(serde_json::json!({
            "entity_id": ["light.a", "light.b"],
            "view": true,
        }));
        let AttributeValue::Map(map) = val else {
            panic!("expected map");
        };
        assert_eq!(map.get("view"), Some(&AttributeValue::Bool(true)));
        assert_eq!(
            map.get("entity_id").and_then(AttributeValue::as_list).map(<[_]>::len),
            Some(2)
        );
    }

    #[test]
    fn should_serialize_string_variant_as_plain_string() {
        let val = AttributeValue::String("hello".to_string());
        let json = serde_json::to_string(&val).unwrap();
        assert_eq!(json, "\"hello\"");
    }

    #[test]
    fn should_expose_typed_accessors() {
        assert_eq!(AttributeValue::Bool(true).as_bool(), Some(true));
        assert_eq!(AttributeValue::from("on").as_str(), Some("on"));
        assert_eq!(AttributeValue::Int(1).as_bool(), None);
        assert!(AttributeValue::Null.as_list().is_none());
    }

    #[test]
    fn should_display_compact_representation() {
        let val = AttributeValue::List(vec![
            AttributeValue::Int(1),
            AttributeValue::from("two"),
            AttributeValue::Null,
        ]);
        assert_eq!(val.to_string(), "[1, \"two\", null]");
    }
}
