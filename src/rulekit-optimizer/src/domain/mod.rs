//! Operator semantics tables.
//!
//! A [`Domain`] supplies everything the reducer needs to fold a subtree whose
//! inputs are all constant: how literals render, how each operator combines
//! rendered operands, and how folded values are written back into the tree.

mod sql;
mod value;

pub use sql::{SqlDomain, SqlFragment};
pub use value::{apply_binary, apply_logical, apply_unary, ValueDomain};

use std::fmt;

use common_error::ExpressionResult;
use rulekit_core::{BinaryOperator, LogicalOperator, Shape, UnaryOperator, Value};

/// Target of compilation sharing the generic reducer.
pub trait Domain: Send + Sync + 'static {
    /// Folded value type.
    type Value: Clone + fmt::Debug + Send + Sync + 'static;

    /// Domain name used in error messages.
    const NAME: &'static str;

    /// Render a literal node's payload.
    fn render_literal(&self, value: &Value, verbatim: bool) -> ExpressionResult<Self::Value>;

    /// Render a literal standing as an element of an array.
    fn render_element(&self, value: &Value, verbatim: bool) -> ExpressionResult<Self::Value> {
        self.render_literal(value, verbatim)
    }

    /// Literal payload `(value, verbatim)` that renders back to `value`.
    fn store(&self, value: Self::Value) -> (Value, bool);

    /// Apply a prefix operator.
    fn unary(&self, operator: UnaryOperator, operand: &Self::Value) -> ExpressionResult<Self::Value>;

    /// Apply an infix operator.
    fn binary(
        &self,
        operator: BinaryOperator,
        left: &Self::Value,
        right: &Self::Value,
    ) -> ExpressionResult<Self::Value>;

    /// Combine a boolean chain whose operands are all constant.
    fn logical(
        &self,
        operator: LogicalOperator,
        operands: &[Self::Value],
    ) -> ExpressionResult<Self::Value>;

    /// Build an array from constant elements.
    fn array(&self, elements: Vec<Self::Value>) -> ExpressionResult<Self::Value>;

    /// Fold a conditional whose parts are constant but whose test cannot be
    /// decided statically. `None` keeps the node.
    fn conditional(
        &self,
        test: &Self::Value,
        consequent: &Self::Value,
        alternate: &Self::Value,
    ) -> Option<Self::Value>;

    /// Value spliced into the tree for a schema entry, if the domain embeds
    /// such entries directly.
    fn splice(&self, shape: &Shape) -> Option<Self::Value>;
}
