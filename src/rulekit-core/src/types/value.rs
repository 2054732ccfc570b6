//! Runtime value representation.
//!
//! Rules are written against loosely typed JSON-like data, so values follow the
//! coercion rules of the scripting languages rule authors expect: truthiness,
//! numeric coercion of strings, loose equality and 32-bit integer operators.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::PathSegment;

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Runtime value in rulekit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    /// Absent value (missing scope entry or member path).
    #[default]
    Undefined,
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Number; all numbers are 64-bit floats.
    Number(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence of values.
    Array(Vec<Value>),
    /// Map of string keys to values.
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// Build an object value from key/value pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Check if this value is null or undefined.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Self::Undefined | Self::Null)
    }

    /// Try to get as boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get as number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Try to get as string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get as array slice.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Get the type name used in type estimates.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Boolean coercion.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Array(_) | Self::Object(_) => true,
        }
    }

    /// Numeric coercion. Strings accept decimal and exponent forms, the
    /// `Infinity` spellings and unsigned `0x`/`0o`/`0b` integers. Unparseable
    /// input yields `NaN`.
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Undefined | Self::Object(_) => f64::NAN,
            Self::Null => 0.0,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::String(s) => parse_number(s),
            Self::Array(_) => parse_number(&self.to_string()),
        }
    }

    /// Coerce to a signed 32-bit integer with wrap-around.
    pub fn to_int32(&self) -> i32 {
        self.to_uint32() as i32
    }

    /// Coerce to an unsigned 32-bit integer with wrap-around.
    pub fn to_uint32(&self) -> u32 {
        let n = self.to_number();
        if !n.is_finite() {
            return 0;
        }
        n.trunc().rem_euclid(4_294_967_296.0) as u32
    }

    /// Equality with type coercion (`1 = "1"` holds).
    pub fn loose_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (a, b) if a.is_nullish() && b.is_nullish() => true,
            (a, b) if a.is_nullish() || b.is_nullish() => false,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Array(_), Self::Array(_)) | (Self::Object(_), Self::Object(_)) => {
                self.strict_eq(other)
            }
            (Self::Bool(_), _) => Self::Number(self.to_number()).loose_eq(other),
            (_, Self::Bool(_)) => self.loose_eq(&Self::Number(other.to_number())),
            (Self::Number(a), Self::String(_)) => *a == other.to_number(),
            (Self::String(_), Self::Number(b)) => self.to_number() == *b,
            (Self::Array(_) | Self::Object(_), _) => {
                Self::String(self.to_string()).loose_eq(other)
            }
            (_, Self::Array(_) | Self::Object(_)) => {
                self.loose_eq(&Self::String(other.to_string()))
            }
            _ => false,
        }
    }

    /// Equality without type coercion; `NaN` equals itself.
    pub fn strict_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Self::Array(a), Self::Array(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.strict_eq(y))
            }
            (Self::Object(a), Self::Object(b)) => {
                a.len() == b.len()
                    && a
                        .iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && va.strict_eq(vb))
            }
            (a, b) => a == b,
        }
    }

    /// Relational comparison: strings compare lexicographically, everything
    /// else numerically. `None` when either side is `NaN`.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        let left = self.to_primitive();
        let right = other.to_primitive();
        match (&left, &right) {
            (Self::String(a), Self::String(b)) => Some(a.cmp(b)),
            _ => left.to_number().partial_cmp(&right.to_number()),
        }
    }

    /// Follow a member path through objects and arrays.
    pub fn get_path(&self, path: &[PathSegment]) -> Option<&Value> {
        path.iter().try_fold(self, |current, segment| current.get(segment))
    }

    /// Single member access.
    pub fn get(&self, segment: &PathSegment) -> Option<&Value> {
        match (self, segment) {
            (Self::Object(map), PathSegment::Key(key)) => map.get(key),
            (Self::Object(map), PathSegment::Index(index)) => map.get(&index.to_string()),
            (Self::Array(items), PathSegment::Index(index)) => items.get(*index),
            (Self::Array(items), PathSegment::Key(key)) => {
                key.parse::<usize>().ok().and_then(|i| items.get(i))
            }
            _ => None,
        }
    }

    /// View the value as a sequence: arrays as-is, anything else as a
    /// one-element sequence.
    pub fn to_items(&self) -> Vec<Value> {
        match self {
            Self::Array(items) => items.clone(),
            other => vec![other.clone()],
        }
    }

    fn to_primitive(&self) -> Self {
        match self {
            Self::Array(_) | Self::Object(_) => Self::String(self.to_string()),
            other => other.clone(),
        }
    }
}

fn parse_number(s: &str) -> f64 {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    if let Some(n) = parse_radix(trimmed) {
        return n;
    }
    match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        // Rust accepts spellings like "inf" and "nan" that rule data must not
        _ if trimmed.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => {
            f64::NAN
        }
        _ => trimmed.parse::<f64>().unwrap_or(f64::NAN),
    }
}

/// Prefixed integer literal; `None` when `s` has no radix prefix.
fn parse_radix(s: &str) -> Option<f64> {
    let radix = match s.get(..2)? {
        "0x" | "0X" => 16,
        "0o" | "0O" => 8,
        "0b" | "0B" => 2,
        _ => return None,
    };
    let digits = &s[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let parsed = digits.chars().try_fold(0.0f64, |acc, c| {
        c.to_digit(radix)
            .map(|digit| acc * f64::from(radix) + f64::from(digit))
    });
    Some(parsed.unwrap_or(f64::NAN))
}

/// Magnitudes outside `[1e-6, 1e21)` print in exponent form (`1e+21`).
fn format_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_nan() {
        write!(f, "NaN")
    } else if n.is_infinite() {
        write!(f, "{}", if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n != 0.0 && (n.abs() >= 1e21 || n.abs() < 1e-6) {
        let text = format!("{n:e}");
        match text.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                write!(f, "{mantissa}e+{exponent}")
            }
            _ => f.write_str(&text),
        }
    } else if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

/// String conversion as used by `+` concatenation and SQL rendering.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => format_number(*n, f),
            Self::String(s) => write!(f, "{s}"),
            Self::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    if !item.is_nullish() {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Self::Object(_) => write!(f, "[object Object]"),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Undefined | Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                Self::from(n as i64)
            }
            Value::Number(n) => serde_json::Number::from_f64(n).map_or(Self::Null, Self::Number),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Undefined.is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::Array(vec![]).is_truthy());
        assert!(Value::object(Vec::<(String, Value)>::new()).is_truthy());
    }

    #[test]
    fn test_number_coercion() {
        assert_eq!(Value::from(" 42 ").to_number(), 42.0);
        assert_eq!(Value::from("").to_number(), 0.0);
        assert_eq!(Value::Null.to_number(), 0.0);
        assert_eq!(Value::from(true).to_number(), 1.0);
        assert!(Value::from("abc").to_number().is_nan());
        assert!(Value::from("inf").to_number().is_nan());
        assert_eq!(Value::from("1e3").to_number(), 1000.0);
        assert_eq!(Value::Array(vec![Value::from(7)]).to_number(), 7.0);
    }

    #[test]
    fn test_prefixed_integers() {
        assert_eq!(Value::from("0x10").to_number(), 16.0);
        assert_eq!(Value::from(" 0o17 ").to_number(), 15.0);
        assert_eq!(Value::from("0B101").to_number(), 5.0);
        assert!(Value::from("0x").to_number().is_nan());
        assert!(Value::from("0b102").to_number().is_nan());
        assert!(Value::from("-0x10").to_number().is_nan());
    }

    #[test]
    fn test_exponent_display() {
        assert_eq!(Value::from(1e21).to_string(), "1e+21");
        assert_eq!(Value::from(-1.5e22).to_string(), "-1.5e+22");
        assert_eq!(Value::from(1e20).to_string(), "100000000000000000000");
        assert_eq!(Value::from(1e-7).to_string(), "1e-7");
        assert_eq!(Value::from(0.000001).to_string(), "0.000001");
        assert_eq!(Value::from(0.0).to_string(), "0");
    }

    #[test]
    fn test_int32_wrapping() {
        assert_eq!(Value::from(4_294_967_295.0).to_int32(), -1);
        assert_eq!(Value::from(-1).to_uint32(), 4_294_967_295);
        assert_eq!(Value::from(2.9).to_int32(), 2);
        assert_eq!(Value::Number(f64::INFINITY).to_int32(), 0);
    }

    #[test]
    fn test_loose_equality() {
        assert!(Value::from(1).loose_eq(&Value::from("1")));
        assert!(Value::from(true).loose_eq(&Value::from(1)));
        assert!(Value::Null.loose_eq(&Value::Undefined));
        assert!(!Value::Null.loose_eq(&Value::from(0)));
        assert!(Value::Array(vec![Value::from(1)]).loose_eq(&Value::from("1")));
        assert!(!Value::from(1).loose_eq(&Value::from(2)));
        assert!(!Value::Number(f64::NAN).loose_eq(&Value::Number(f64::NAN)));
    }

    #[test]
    fn test_strict_equality() {
        assert!(!Value::from(1).strict_eq(&Value::from("1")));
        assert!(Value::Number(f64::NAN).strict_eq(&Value::Number(f64::NAN)));
        assert!(Value::from(vec![Value::from("a")]).strict_eq(&Value::from(vec![Value::from("a")])));
    }

    #[test]
    fn test_compare() {
        assert_eq!(Value::from("b").compare(&Value::from("a")), Some(Ordering::Greater));
        assert_eq!(Value::from("10").compare(&Value::from(9)), Some(Ordering::Greater));
        assert_eq!(Value::from("x").compare(&Value::from(1)), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(5).to_string(), "5");
        assert_eq!(Value::from(0.5).to_string(), "0.5");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
        assert_eq!(
            Value::from(vec![Value::from(1), Value::Null, Value::from("a")]).to_string(),
            "1,,a"
        );
    }

    #[test]
    fn test_get_path() {
        let value: Value = serde_json::json!({"trx": {"tags": ["a", "b"], "amount": 0}}).into();

        let path = [PathSegment::from("trx"), PathSegment::from("tags"), PathSegment::Index(1)];
        assert_eq!(value.get_path(&path), Some(&Value::from("b")));

        let path = [PathSegment::from("trx"), PathSegment::from("amount")];
        assert_eq!(value.get_path(&path), Some(&Value::from(0)));

        let path = [PathSegment::from("trx"), PathSegment::from("missing")];
        assert_eq!(value.get_path(&path), None);
    }

    #[test]
    fn test_json_conversion() {
        let value: Value = serde_json::from_str(r#"{"a": [1, 2.5, null, true]}"#).unwrap();
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"a":[1,2.5,null,true]}"#);
    }
}
