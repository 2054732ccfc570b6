//! Schema shapes.

use std::collections::BTreeMap;

use common_error::{ExpressionError, ExpressionResult};
use serde::{Deserialize, Serialize};

use crate::ast::PathSegment;

/// Declared shape of a schema entry.
///
/// JSON form: a leaf is an object whose `type` key holds a string
/// (`{"type": "number"}`, `{"type": "field", "value": "t.amount"}`,
/// `{"type": "placeholder", "value": ":amount"}`); any other object is a
/// nested shape keyed by member name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum Shape {
    /// Scalar of the named type.
    Scalar(String),
    /// SQL column reference, emitted verbatim by the SQL compiler.
    Field(String),
    /// Bound-parameter marker, emitted verbatim by the SQL compiler.
    Placeholder(String),
    /// Nested members.
    Object(BTreeMap<String, Shape>),
}

impl Shape {
    /// Scalar shape of the given type.
    pub fn scalar(type_name: impl Into<String>) -> Self {
        Self::Scalar(type_name.into())
    }

    /// SQL column reference.
    pub fn field(column: impl Into<String>) -> Self {
        Self::Field(column.into())
    }

    /// SQL bound-parameter marker.
    pub fn placeholder(marker: impl Into<String>) -> Self {
        Self::Placeholder(marker.into())
    }

    /// Nested object shape.
    pub fn object<K, I>(members: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Shape)>,
    {
        Self::Object(members.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Type name used in type estimates.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Scalar(name) => name,
            Self::Field(_) => "field",
            Self::Placeholder(_) => "placeholder",
            Self::Object(_) => "object",
        }
    }

    /// Single member lookup.
    pub fn get(&self, segment: &PathSegment) -> Option<&Shape> {
        match self {
            Self::Object(members) => match segment {
                PathSegment::Key(key) => members.get(key),
                PathSegment::Index(index) => members.get(&index.to_string()),
            },
            _ => None,
        }
    }

    /// Follow a member path.
    pub fn lookup(&self, path: &[PathSegment]) -> Option<&Shape> {
        path.iter().try_fold(self, |current, segment| current.get(segment))
    }
}

impl TryFrom<serde_json::Value> for Shape {
    type Error = ExpressionError;

    fn try_from(value: serde_json::Value) -> ExpressionResult<Self> {
        let serde_json::Value::Object(mut map) = value else {
            return Err(ExpressionError::invalid_parameter(format!(
                "schema entry must be an object, got {value}"
            )));
        };

        let leaf_type = match map.get("type") {
            Some(serde_json::Value::String(name)) => Some(name.trim().to_string()),
            _ => None,
        };

        let Some(leaf_type) = leaf_type else {
            let members = map
                .into_iter()
                .map(|(key, member)| Ok((key, Self::try_from(member)?)))
                .collect::<ExpressionResult<BTreeMap<_, _>>>()?;
            return Ok(Self::Object(members));
        };

        match leaf_type.as_str() {
            "field" | "placeholder" => {
                let Some(serde_json::Value::String(text)) = map.remove("value") else {
                    return Err(ExpressionError::invalid_parameter(format!(
                        "schema {leaf_type} entry requires a string `value`"
                    )));
                };
                Ok(if leaf_type == "field" {
                    Self::Field(text)
                } else {
                    Self::Placeholder(text)
                })
            }
            _ => Ok(Self::Scalar(leaf_type)),
        }
    }
}

impl From<Shape> for serde_json::Value {
    fn from(shape: Shape) -> Self {
        match shape {
            Shape::Scalar(name) => serde_json::json!({ "type": name }),
            Shape::Field(column) => serde_json::json!({ "type": "field", "value": column }),
            Shape::Placeholder(marker) => {
                serde_json::json!({ "type": "placeholder", "value": marker })
            }
            Shape::Object(members) => Self::Object(
                members
                    .into_iter()
                    .map(|(key, member)| (key, Self::from(member)))
                    .collect(),
            ),
        }
    }
}

/// Immutable mapping from identifier name to declared shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    entries: BTreeMap<String, Shape>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry (builder style).
    #[must_use]
    pub fn with_entry(mut self, name: impl Into<String>, shape: Shape) -> Self {
        self.entries.insert(name.into(), shape);
        self
    }

    /// Parse a schema from its JSON form.
    pub fn from_json(value: serde_json::Value) -> ExpressionResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Look up a top-level entry.
    pub fn get(&self, name: &str) -> Option<&Shape> {
        self.entries.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_schema() -> Schema {
        Schema::from_json(serde_json::json!({
            "trx": {
                "type": { "type": "placeholder", "value": ":type" },
                "amount": { "type": "placeholder", "value": ":amount" },
            },
            "past": {
                "amount": { "type": "field", "value": "t.amount" },
            },
            "prohibitedCountries": { "type": "array " },
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_leaves_and_objects() {
        let schema = sql_schema();

        assert_eq!(schema.get("prohibitedCountries"), Some(&Shape::scalar("array")));

        let past = schema.get("past").unwrap();
        assert_eq!(past.type_name(), "object");
        assert_eq!(
            past.lookup(&[PathSegment::from("amount")]),
            Some(&Shape::field("t.amount"))
        );
    }

    #[test]
    fn test_member_named_type_is_not_a_leaf() {
        let schema = sql_schema();
        let trx = schema.get("trx").unwrap();

        assert_eq!(
            trx.lookup(&[PathSegment::from("type")]),
            Some(&Shape::placeholder(":type"))
        );
    }

    #[test]
    fn test_missing_path() {
        let schema = sql_schema();
        let trx = schema.get("trx").unwrap();
        assert_eq!(trx.lookup(&[PathSegment::from("currency")]), None);
        assert_eq!(
            trx.lookup(&[PathSegment::from("amount"), PathSegment::from("x")]),
            None
        );
    }

    #[test]
    fn test_invalid_entries() {
        assert!(Schema::from_json(serde_json::json!({ "a": 1 })).is_err());
        assert!(Schema::from_json(serde_json::json!({ "a": { "type": "field" } })).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let schema = sql_schema();
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(Schema::from_json(json).unwrap(), schema);
    }
}
