//! Per-node results of the reducer.

use std::fmt;
use std::sync::Arc;

use rulekit_core::{Shape, TypeEstimate};

use crate::feature::StaticFeature;

/// Where a reduced node's value comes from.
pub enum Origin<V> {
    /// Compile-time constant, rendered in the domain's value type.
    Literal(V),
    /// Resolved against the schema.
    Identifier(Shape),
    /// Resolved to a registered feature.
    Feature {
        name: String,
        feature: Arc<dyn StaticFeature<V>>,
    },
    /// Non-constant expression, with its declared shape when one is known.
    Computed(Option<Shape>),
}

impl<V: Clone> Clone for Origin<V> {
    fn clone(&self) -> Self {
        match self {
            Self::Literal(value) => Self::Literal(value.clone()),
            Self::Identifier(shape) => Self::Identifier(shape.clone()),
            Self::Feature { name, feature } => Self::Feature {
                name: name.clone(),
                feature: Arc::clone(feature),
            },
            Self::Computed(shape) => Self::Computed(shape.clone()),
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Origin<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            Self::Identifier(shape) => f.debug_tuple("Identifier").field(shape).finish(),
            Self::Feature { name, .. } => f.debug_struct("Feature").field("name", name).finish(),
            Self::Computed(shape) => f.debug_tuple("Computed").field(shape).finish(),
        }
    }
}

/// Short-lived view of a reduced node: its estimated type, cost and origin.
#[derive(Debug, Clone)]
pub struct EvaluationResult<V> {
    /// Estimated result type.
    pub type_estimate: TypeEstimate,
    /// Weight assigned to the node.
    pub weight: u32,
    /// Provenance of the value.
    pub origin: Origin<V>,
}

impl<V> EvaluationResult<V> {
    /// Result of a node that folded to a constant.
    pub fn literal(type_estimate: TypeEstimate, value: V) -> Self {
        Self {
            type_estimate,
            weight: 0,
            origin: Origin::Literal(value),
        }
    }

    /// Result of a non-constant node.
    pub fn computed(type_estimate: TypeEstimate, weight: u32, shape: Option<Shape>) -> Self {
        Self {
            type_estimate,
            weight,
            origin: Origin::Computed(shape),
        }
    }

    /// Check if the node folded to a constant.
    pub fn is_literal(&self) -> bool {
        matches!(self.origin, Origin::Literal(_))
    }

    /// Constant value, if the node folded.
    pub fn literal_value(&self) -> Option<&V> {
        match &self.origin {
            Origin::Literal(value) => Some(value),
            _ => None,
        }
    }

    /// Declared shape, when known statically.
    pub fn shape(&self) -> Option<&Shape> {
        match &self.origin {
            Origin::Identifier(shape) | Origin::Computed(Some(shape)) => Some(shape),
            _ => None,
        }
    }
}
