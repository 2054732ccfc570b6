//! Member access path segments.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One step of a member path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathSegment {
    /// Array index (non-negative integer in JSON).
    Index(usize),
    /// Object key.
    Key(String),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "[{index}]"),
            Self::Key(key) => write!(f, ".{key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_forms() {
        let path: Vec<PathSegment> = serde_json::from_str(r#"["tags", 0, "name"]"#).unwrap();
        assert_eq!(
            path,
            vec![
                PathSegment::from("tags"),
                PathSegment::Index(0),
                PathSegment::from("name")
            ]
        );
        assert_eq!(serde_json::to_string(&path).unwrap(), r#"["tags",0,"name"]"#);
    }

    #[test]
    fn test_negative_index_rejected() {
        assert!(serde_json::from_str::<PathSegment>("-1").is_err());
    }
}
