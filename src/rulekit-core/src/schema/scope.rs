//! Runtime scope.

use std::collections::BTreeMap;

use common_error::{ExpressionError, ExpressionResult};
use serde::{Deserialize, Serialize};

use crate::types::Value;

/// Mapping from identifier name to concrete value, bound to one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scope {
    values: BTreeMap<String, Value>,
}

impl Scope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a binding (builder style).
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Add or replace a binding.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Look up a binding.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Build a scope from a JSON object.
    pub fn from_json(value: serde_json::Value) -> ExpressionResult<Self> {
        match Value::from(value) {
            Value::Object(values) => Ok(Self { values }),
            other => Err(ExpressionError::invalid_parameter(format!(
                "scope must be an object, got {}",
                other.type_name()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let scope = Scope::from_json(serde_json::json!({
            "trx": { "amount": 500 },
            "prohibitedCountries": ["BY", "RU"],
        }))
        .unwrap();

        assert_eq!(
            scope.get("prohibitedCountries"),
            Some(&Value::from(vec![Value::from("BY"), Value::from("RU")]))
        );
        assert!(scope.get("missing").is_none());
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(Scope::from_json(serde_json::json!([1, 2])).is_err());
    }

    #[test]
    fn test_builder() {
        let scope = Scope::new().with("limit", 100).with("currency", "EUR");
        assert_eq!(scope.get("limit"), Some(&Value::from(100)));
        assert_eq!(scope.get("currency").and_then(Value::as_str), Some("EUR"));
    }
}
