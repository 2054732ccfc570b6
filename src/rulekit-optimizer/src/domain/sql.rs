//! SQL text semantics.
//!
//! Every folded value is a fragment of SQL. Ordinary scalar literals are
//! single-quoted; verbatim literals (spliced `field`/`placeholder` entries and
//! previously compiled text) are emitted unchanged.

use std::fmt;

use common_error::{ExpressionError, ExpressionResult};
use rulekit_core::{BinaryOperator, LogicalOperator, Shape, UnaryOperator, Value};

use super::Domain;

/// Folded SQL value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlFragment {
    /// An expression.
    Text(String),
    /// A parenthesized value list, as used on the right of `IN`.
    List(Vec<String>),
}

impl SqlFragment {
    /// Expression fragment.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Render as a single expression; lists render as `(a,b)`.
    pub fn to_sql(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SqlFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::List(items) => write!(f, "({})", items.join(",")),
        }
    }
}

/// Folds to SQL text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqlDomain;

/// Quote a string as a SQL literal.
pub(crate) fn quote(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn render_scalar(value: &Value) -> ExpressionResult<String> {
    match value {
        Value::Undefined | Value::Null => Ok("NULL".to_string()),
        Value::Bool(true) => Ok("TRUE".to_string()),
        Value::Bool(false) => Ok("FALSE".to_string()),
        Value::Number(_) | Value::String(_) => Ok(quote(&value.to_string())),
        Value::Array(_) | Value::Object(_) => Err(ExpressionError::type_error(format!(
            "{} literal has no SQL scalar form",
            value.type_name()
        ))),
    }
}

fn render_list_item(value: &Value) -> ExpressionResult<String> {
    match value {
        Value::Number(_) => Ok(value.to_string()),
        other => render_scalar(other),
    }
}

/// Whether the whole text is wrapped in one pair of parentheses.
fn is_enclosed(text: &str) -> bool {
    if !text.starts_with('(') || !text.ends_with(')') {
        return false;
    }

    let mut depth = 0usize;
    let mut quoted = false;
    for (i, c) in text.char_indices() {
        match c {
            '\'' => quoted = !quoted,
            '(' if !quoted => depth += 1,
            ')' if !quoted => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == text.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

fn infix(operator: BinaryOperator) -> Option<&'static str> {
    use BinaryOperator::*;

    match operator {
        Multiply => Some("*"),
        Divide => Some("/"),
        Modulo => Some("%"),
        Add => Some("+"),
        Subtract => Some("-"),
        ShiftLeft => Some("<<"),
        ShiftRight => Some(">>"),
        LtEq => Some("<="),
        GtEq => Some(">="),
        Lt => Some("<"),
        Gt => Some(">"),
        Eq => Some("="),
        NotEq => Some("!="),
        BitAnd => Some(" & "),
        BitXor => Some(" ^ "),
        BitOr => Some(" | "),
        Power | ShiftRightUnsigned | In => None,
    }
}

impl Domain for SqlDomain {
    type Value = SqlFragment;

    const NAME: &'static str = "sql";

    fn render_literal(&self, value: &Value, verbatim: bool) -> ExpressionResult<SqlFragment> {
        match (value, verbatim) {
            (Value::Array(items), true) => Ok(SqlFragment::List(
                items.iter().map(ToString::to_string).collect(),
            )),
            (value, true) => Ok(SqlFragment::Text(value.to_string())),
            (Value::Array(items), false) => items
                .iter()
                .map(render_list_item)
                .collect::<ExpressionResult<Vec<_>>>()
                .map(SqlFragment::List),
            (value, false) => render_scalar(value).map(SqlFragment::Text),
        }
    }

    fn render_element(&self, value: &Value, verbatim: bool) -> ExpressionResult<SqlFragment> {
        match (value, verbatim) {
            (Value::Number(_), false) => render_list_item(value).map(SqlFragment::Text),
            (value, verbatim) => self.render_literal(value, verbatim),
        }
    }

    fn store(&self, value: SqlFragment) -> (Value, bool) {
        match value {
            SqlFragment::Text(text) => (Value::String(text), true),
            SqlFragment::List(items) => (
                Value::Array(items.into_iter().map(Value::String).collect()),
                true,
            ),
        }
    }

    fn unary(&self, operator: UnaryOperator, operand: &SqlFragment) -> ExpressionResult<SqlFragment> {
        let text = match operator {
            UnaryOperator::Plus => format!("+({operand})"),
            UnaryOperator::Minus => format!("-({operand})"),
            UnaryOperator::BitNot => format!("~({operand})"),
            UnaryOperator::Not => format!("NOT ({operand})"),
        };
        Ok(SqlFragment::Text(text))
    }

    fn binary(
        &self,
        operator: BinaryOperator,
        left: &SqlFragment,
        right: &SqlFragment,
    ) -> ExpressionResult<SqlFragment> {
        let text = match operator {
            BinaryOperator::Power => format!("POWER({left},{right})"),
            BinaryOperator::In => match right {
                SqlFragment::List(items) => format!("{left} IN ({})", items.join(",")),
                SqlFragment::Text(text) => format!("{left}={text}"),
            },
            BinaryOperator::ShiftRightUnsigned => {
                return Err(ExpressionError::unsupported_operator(
                    operator.symbol(),
                    Self::NAME,
                ))
            }
            other => match infix(other) {
                Some(symbol) => format!("({left}{symbol}{right})"),
                None => {
                    return Err(ExpressionError::unsupported_operator(
                        other.symbol(),
                        Self::NAME,
                    ))
                }
            },
        };
        Ok(SqlFragment::Text(text))
    }

    fn logical(
        &self,
        operator: LogicalOperator,
        operands: &[SqlFragment],
    ) -> ExpressionResult<SqlFragment> {
        let separator = match operator {
            LogicalOperator::And => " AND ",
            LogicalOperator::Or => " OR ",
        };

        let text = match operands {
            [] => render_scalar(&Value::Bool(operator.neutral()))?,
            [single] => single.to_sql(),
            _ => operands
                .iter()
                .map(|operand| {
                    let text = operand.to_sql();
                    if is_enclosed(&text) {
                        text
                    } else {
                        format!("({text})")
                    }
                })
                .collect::<Vec<_>>()
                .join(separator),
        };
        Ok(SqlFragment::Text(text))
    }

    fn array(&self, elements: Vec<SqlFragment>) -> ExpressionResult<SqlFragment> {
        Ok(SqlFragment::List(
            elements.iter().map(SqlFragment::to_sql).collect(),
        ))
    }

    fn conditional(
        &self,
        test: &SqlFragment,
        consequent: &SqlFragment,
        alternate: &SqlFragment,
    ) -> Option<SqlFragment> {
        Some(SqlFragment::Text(format!(
            "CASE WHEN {test} THEN {consequent} ELSE {alternate} END"
        )))
    }

    fn splice(&self, shape: &Shape) -> Option<SqlFragment> {
        match shape {
            Shape::Field(text) | Shape::Placeholder(text) => Some(SqlFragment::Text(text.clone())),
            Shape::Scalar(_) | Shape::Object(_) => None,
        }
    }
}
