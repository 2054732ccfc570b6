//! Operator symbols.
//!
//! Each enum serializes to the symbol the parser emits; alternate spellings
//! (`==`, `<>`, `&&`, `||`) are accepted on input and normalized.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    /// Numeric coercion (+)
    #[serde(rename = "+")]
    Plus,
    /// Numeric negation (-)
    #[serde(rename = "-")]
    Minus,
    /// 32-bit complement (~)
    #[serde(rename = "~")]
    BitNot,
    /// Boolean negation (!)
    #[serde(rename = "!")]
    Not,
}

impl UnaryOperator {
    /// Get the operator symbol for display.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::BitNot => "~",
            Self::Not => "!",
        }
    }
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    // Arithmetic
    /// Exponentiation (**)
    #[serde(rename = "**")]
    Power,
    /// Multiplication (*)
    #[serde(rename = "*")]
    Multiply,
    /// Division (/)
    #[serde(rename = "/")]
    Divide,
    /// Remainder (%)
    #[serde(rename = "%")]
    Modulo,
    /// Addition or string concatenation (+)
    #[serde(rename = "+")]
    Add,
    /// Subtraction (-)
    #[serde(rename = "-")]
    Subtract,

    // Shifts
    /// Left shift (<<)
    #[serde(rename = "<<")]
    ShiftLeft,
    /// Sign-propagating right shift (>>)
    #[serde(rename = ">>")]
    ShiftRight,
    /// Zero-filling right shift (>>>)
    #[serde(rename = ">>>")]
    ShiftRightUnsigned,

    // Comparison
    /// Less than or equal (<=)
    #[serde(rename = "<=")]
    LtEq,
    /// Greater than or equal (>=)
    #[serde(rename = ">=")]
    GtEq,
    /// Less than (<)
    #[serde(rename = "<")]
    Lt,
    /// Greater than (>)
    #[serde(rename = ">")]
    Gt,
    /// Coercing equality (=)
    #[serde(rename = "=", alias = "==")]
    Eq,
    /// Coercing inequality (!=, <>)
    #[serde(rename = "!=", alias = "<>")]
    NotEq,

    // Bitwise
    /// Bitwise and (&)
    #[serde(rename = "&")]
    BitAnd,
    /// Bitwise xor (^)
    #[serde(rename = "^")]
    BitXor,
    /// Bitwise or (|)
    #[serde(rename = "|")]
    BitOr,

    /// Membership (in)
    #[serde(rename = "in")]
    In,
}

impl BinaryOperator {
    /// Get the operator symbol for display.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Power => "**",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::Add => "+",
            Self::Subtract => "-",
            Self::ShiftLeft => "<<",
            Self::ShiftRight => ">>",
            Self::ShiftRightUnsigned => ">>>",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::BitOr => "|",
            Self::In => "in",
        }
    }
}

/// Short-circuiting boolean chain operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOperator {
    /// Conjunction (and, &&)
    #[serde(rename = "and", alias = "&&")]
    And,
    /// Disjunction (or, ||)
    #[serde(rename = "or", alias = "||")]
    Or,
}

impl LogicalOperator {
    /// Get the operator keyword for display.
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }

    /// Result of an empty chain: `true` for `and`, `false` for `or`.
    pub const fn neutral(&self) -> bool {
        matches!(self, Self::And)
    }

    /// Whether an operand with this truthiness decides the whole chain
    /// (falsy for `and`, truthy for `or`).
    pub const fn decides(&self, truthy: bool) -> bool {
        truthy != self.neutral()
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aliases_normalize() {
        let ne: BinaryOperator = serde_json::from_str(r#""<>""#).unwrap();
        assert_eq!(ne, BinaryOperator::NotEq);
        assert_eq!(serde_json::to_string(&ne).unwrap(), r#""!=""#);

        let eq: BinaryOperator = serde_json::from_str(r#""==""#).unwrap();
        assert_eq!(eq, BinaryOperator::Eq);

        let and: LogicalOperator = serde_json::from_str(r#""&&""#).unwrap();
        assert_eq!(and, LogicalOperator::And);
        let or: LogicalOperator = serde_json::from_str(r#""||""#).unwrap();
        assert_eq!(or.symbol(), "or");
    }

    #[test]
    fn test_unknown_operator_rejected() {
        assert!(serde_json::from_str::<BinaryOperator>(r#""===""#).is_err());
        assert!(serde_json::from_str::<LogicalOperator>(r#""xor""#).is_err());
    }

    #[test]
    fn test_logical_decision() {
        assert!(LogicalOperator::And.neutral());
        assert!(LogicalOperator::And.decides(false));
        assert!(!LogicalOperator::And.decides(true));
        assert!(!LogicalOperator::Or.neutral());
        assert!(LogicalOperator::Or.decides(true));
    }
}
