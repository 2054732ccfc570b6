//! Static type estimates computed by the optimizer.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Estimated type of an expression: a single type name, or the set of
/// candidate names when operands or branches disagree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeEstimate {
    /// Exactly one candidate type.
    One(String),
    /// Several candidate types, deduplicated, in first-seen order.
    Many(Vec<String>),
}

impl TypeEstimate {
    /// Estimate with a single candidate.
    pub fn named(name: impl Into<String>) -> Self {
        Self::One(name.into())
    }

    /// Merge estimates, flattening nested candidate sets and dropping
    /// duplicates. A single survivor collapses to [`TypeEstimate::One`].
    pub fn union<I>(estimates: I) -> Self
    where
        I: IntoIterator<Item = TypeEstimate>,
    {
        let mut names: Vec<String> = Vec::new();
        for estimate in estimates {
            for name in estimate.into_names() {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }

        match names.len() {
            0 => Self::named("undefined"),
            1 => Self::One(names.remove(0)),
            _ => Self::Many(names),
        }
    }

    /// Candidate names.
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::One(name) => vec![name.as_str()],
            Self::Many(names) => names.iter().map(String::as_str).collect(),
        }
    }

    /// Whether this is exactly the single type `name`.
    pub fn is(&self, name: &str) -> bool {
        matches!(self, Self::One(n) if n == name)
    }

    fn into_names(self) -> Vec<String> {
        match self {
            Self::One(name) => vec![name],
            Self::Many(names) => names,
        }
    }
}

impl fmt::Display for TypeEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names().join("|"))
    }
}
