//! Expression nodes.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{BinaryOperator, LogicalOperator, PathSegment, UnaryOperator};
use crate::types::Value;

/// A node of the expression tree.
///
/// The parser produces the `kind`; `weight` is a cost estimate assigned by the
/// optimizer and consumed by the interpreter to order short-circuit operands.
/// It is written out with the node but never read back from input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Variant payload.
    #[serde(flatten)]
    pub kind: NodeKind,
    /// Estimated evaluation cost.
    #[serde(default, skip_deserializing)]
    pub weight: u32,
}

/// Closed set of expression variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// Constant value. A verbatim literal holds domain-ready text that is
    /// emitted unchanged (compiled SQL, spliced column references). Only the
    /// optimizer marks literals verbatim; the flag is never read from input.
    Literal {
        value: Value,
        #[serde(default, skip_deserializing, skip_serializing_if = "std::ops::Not::not")]
        verbatim: bool,
    },
    /// Reference to a schema entry, scope value or feature.
    Identifier { name: String },
    /// Prefix operator application.
    UnaryExpression {
        operator: UnaryOperator,
        operand: Box<Node>,
    },
    /// Infix operator application.
    BinaryExpression {
        operator: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Short-circuiting boolean chain.
    LogicalExpression {
        operator: LogicalOperator,
        operands: Vec<Node>,
    },
    /// Array constructor.
    ArrayExpression { elements: Vec<Node> },
    /// `test ? consequent : alternate`.
    ConditionalExpression {
        test: Box<Node>,
        consequent: Box<Node>,
        alternate: Box<Node>,
    },
    /// Comma expression; evaluates to its last element.
    SequenceExpression { expressions: Vec<Node> },
    /// Feature invocation.
    CallExpression {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    /// Property access along a path.
    MemberExpression {
        object: Box<Node>,
        path: Vec<PathSegment>,
    },
}

impl Node {
    /// Wrap a variant with an unassigned weight.
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, weight: 0 }
    }

    /// Constant literal.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::new(NodeKind::Literal {
            value: value.into(),
            verbatim: false,
        })
    }

    /// Literal whose value is emitted unchanged by the target domain.
    pub fn verbatim(value: impl Into<Value>) -> Self {
        Self::new(NodeKind::Literal {
            value: value.into(),
            verbatim: true,
        })
    }

    /// Identifier reference.
    pub fn identifier(name: impl Into<String>) -> Self {
        Self::new(NodeKind::Identifier { name: name.into() })
    }

    /// Prefix operator.
    pub fn unary(operator: UnaryOperator, operand: Node) -> Self {
        Self::new(NodeKind::UnaryExpression {
            operator,
            operand: Box::new(operand),
        })
    }

    /// Infix operator.
    pub fn binary(operator: BinaryOperator, left: Node, right: Node) -> Self {
        Self::new(NodeKind::BinaryExpression {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Boolean chain.
    pub fn logical(operator: LogicalOperator, operands: Vec<Node>) -> Self {
        Self::new(NodeKind::LogicalExpression { operator, operands })
    }

    /// Conjunction.
    pub fn and(operands: Vec<Node>) -> Self {
        Self::logical(LogicalOperator::And, operands)
    }

    /// Disjunction.
    pub fn or(operands: Vec<Node>) -> Self {
        Self::logical(LogicalOperator::Or, operands)
    }

    /// Array constructor.
    pub fn array(elements: Vec<Node>) -> Self {
        Self::new(NodeKind::ArrayExpression { elements })
    }

    /// Ternary conditional.
    pub fn conditional(test: Node, consequent: Node, alternate: Node) -> Self {
        Self::new(NodeKind::ConditionalExpression {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })
    }

    /// Comma expression.
    pub fn sequence(expressions: Vec<Node>) -> Self {
        Self::new(NodeKind::SequenceExpression { expressions })
    }

    /// Call of the feature registered as `name`.
    pub fn call(name: impl Into<String>, arguments: Vec<Node>) -> Self {
        Self::new(NodeKind::CallExpression {
            callee: Box::new(Self::identifier(name)),
            arguments,
        })
    }

    /// Member access.
    pub fn member<P, I>(object: Node, path: I) -> Self
    where
        P: Into<PathSegment>,
        I: IntoIterator<Item = P>,
    {
        Self::new(NodeKind::MemberExpression {
            object: Box::new(object),
            path: path.into_iter().map(Into::into).collect(),
        })
    }

    /// Parse a parser-produced JSON tree.
    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Check if this node is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self.kind, NodeKind::Literal { .. })
    }

    /// Literal payload, if this node is a literal.
    pub fn as_literal(&self) -> Option<(&Value, bool)> {
        match &self.kind {
            NodeKind::Literal { value, verbatim } => Some((value, *verbatim)),
            _ => None,
        }
    }

    /// Rewrite this node in place into a literal.
    pub fn set_literal(&mut self, value: Value, verbatim: bool) {
        self.kind = NodeKind::Literal { value, verbatim };
        self.weight = 0;
    }

    /// Variant name, as used in the JSON `type` tag.
    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Literal { .. } => "Literal",
            NodeKind::Identifier { .. } => "Identifier",
            NodeKind::UnaryExpression { .. } => "UnaryExpression",
            NodeKind::BinaryExpression { .. } => "BinaryExpression",
            NodeKind::LogicalExpression { .. } => "LogicalExpression",
            NodeKind::ArrayExpression { .. } => "ArrayExpression",
            NodeKind::ConditionalExpression { .. } => "ConditionalExpression",
            NodeKind::SequenceExpression { .. } => "SequenceExpression",
            NodeKind::CallExpression { .. } => "CallExpression",
            NodeKind::MemberExpression { .. } => "MemberExpression",
        }
    }

    /// Direct children, in evaluation order.
    pub fn children(&self) -> Vec<&Node> {
        match &self.kind {
            NodeKind::Literal { .. } | NodeKind::Identifier { .. } => Vec::new(),
            NodeKind::UnaryExpression { operand, .. } => vec![operand],
            NodeKind::BinaryExpression { left, right, .. } => vec![left, right],
            NodeKind::LogicalExpression { operands, .. } => operands.iter().collect(),
            NodeKind::ArrayExpression { elements } => elements.iter().collect(),
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => vec![test, consequent, alternate],
            NodeKind::SequenceExpression { expressions } => expressions.iter().collect(),
            NodeKind::CallExpression { callee, arguments } => {
                std::iter::once(callee.as_ref()).chain(arguments).collect()
            }
            NodeKind::MemberExpression { object, .. } => vec![object],
        }
    }

    /// Depth of the tree rooted here (a leaf has depth 1).
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Node::depth)
            .max()
            .unwrap_or(0)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, nodes: &[Node], separator: &str) -> fmt::Result {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        write!(f, "{node}")?;
    }
    Ok(())
}

/// Compact infix rendering for logs and diagnostics.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            NodeKind::Literal { value, .. } => match value {
                Value::String(s) => write!(f, "{s:?}"),
                other => write!(f, "{other}"),
            },
            NodeKind::Identifier { name } => f.write_str(name),
            NodeKind::UnaryExpression { operator, operand } => write!(f, "{operator}{operand}"),
            NodeKind::BinaryExpression {
                operator,
                left,
                right,
            } => write!(f, "({left} {operator} {right})"),
            NodeKind::LogicalExpression { operator, operands } => {
                f.write_str("(")?;
                write_list(f, operands, &format!(" {operator} "))?;
                f.write_str(")")
            }
            NodeKind::ArrayExpression { elements } => {
                f.write_str("[")?;
                write_list(f, elements, ", ")?;
                f.write_str("]")
            }
            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => write!(f, "({test} ? {consequent} : {alternate})"),
            NodeKind::SequenceExpression { expressions } => {
                f.write_str("(")?;
                write_list(f, expressions, ", ")?;
                f.write_str(")")
            }
            NodeKind::CallExpression { callee, arguments } => {
                write!(f, "{callee}(")?;
                write_list(f, arguments, ", ")?;
                f.write_str(")")
            }
            NodeKind::MemberExpression { object, path } => {
                write!(f, "{object}")?;
                path.iter().try_for_each(|segment| write!(f, "{segment}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_rewrite_resets_weight() {
        let mut node = Node::binary(BinaryOperator::Add, Node::literal(1), Node::literal(2));
        node.weight = 3;
        node.set_literal(Value::from(3), false);
        assert_eq!(node, Node::literal(3));
        assert_eq!(node.weight, 0);
    }

    #[test]
    fn test_depth_and_children() {
        let node = Node::and(vec![
            Node::call("isCredit", vec![]),
            Node::binary(
                BinaryOperator::Gt,
                Node::member(Node::identifier("trx"), ["amount"]),
                Node::literal(100),
            ),
        ]);
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.depth(), 4);
    }

    #[test]
    fn test_display() {
        let node = Node::and(vec![
            Node::call("isCredit", vec![]),
            Node::binary(
                BinaryOperator::In,
                Node::member(Node::identifier("trx"), ["country"]),
                Node::identifier("prohibitedCountries"),
            ),
        ]);
        assert_eq!(
            node.to_string(),
            "(isCredit() and (trx.country in prohibitedCountries))"
        );
    }
}
