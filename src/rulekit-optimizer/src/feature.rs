//! Static side of the feature extension protocol.

use std::sync::Arc;

use common_error::ExpressionResult;
use rulekit_core::{Node, Shape};

use crate::result::EvaluationResult;

/// Declared result of a feature call site.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureDescriptor<V> {
    /// Cost added to the call node on top of its callee and arguments.
    pub weight: u32,
    /// Declared return shape.
    pub returns: Shape,
    /// Constant the call folds to, when the feature can supply one statically.
    pub value: Option<V>,
}

impl<V> FeatureDescriptor<V> {
    /// Descriptor of an opaque call.
    pub fn new(weight: u32, returns: Shape) -> Self {
        Self {
            weight,
            returns,
            value: None,
        }
    }

    /// Let the call fold to `value`.
    #[must_use]
    pub fn with_value(mut self, value: V) -> Self {
        self.value = Some(value);
        self
    }
}

/// Static description of a feature, consumed by the optimizer once per call
/// site. Must be pure.
pub trait StaticFeature<V>: Send + Sync {
    /// Describe a call given its reduced arguments.
    fn describe(&self, arguments: &[EvaluationResult<V>]) -> ExpressionResult<FeatureDescriptor<V>>;

    /// Compiler applied to the call's arguments instead of the calling
    /// optimizer. Compiled arguments become verbatim string literals.
    fn argument_compiler(&self) -> Option<Arc<dyn ArgumentCompiler>> {
        None
    }
}

/// Turns an argument subtree into domain text, e.g. a SQL fragment.
pub trait ArgumentCompiler: Send + Sync {
    /// Compile `argument` completely or fail.
    fn compile_argument(&self, argument: &Node) -> ExpressionResult<String>;
}
