//! Expression tree handed over by the parser and rewritten by the optimizer.

mod node;
mod operator;
mod path;

pub use node::{Node, NodeKind};
pub use operator::{BinaryOperator, LogicalOperator, UnaryOperator};
pub use path::PathSegment;
