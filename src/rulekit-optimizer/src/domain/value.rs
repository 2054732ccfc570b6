//! Concrete value semantics, shared with the interpreter.

use std::cmp::Ordering;

use common_error::ExpressionResult;
use rulekit_core::{BinaryOperator, LogicalOperator, Shape, UnaryOperator, Value};

use super::Domain;

/// Folds to concrete runtime values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueDomain;

/// Apply a prefix operator to a concrete value.
pub fn apply_unary(operator: UnaryOperator, operand: &Value) -> Value {
    match operator {
        UnaryOperator::Plus => Value::Number(operand.to_number()),
        UnaryOperator::Minus => Value::Number(-operand.to_number()),
        UnaryOperator::BitNot => Value::Number(f64::from(!operand.to_int32())),
        UnaryOperator::Not => Value::Bool(!operand.is_truthy()),
    }
}

/// Apply an infix operator to concrete values.
pub fn apply_binary(operator: BinaryOperator, left: &Value, right: &Value) -> Value {
    use BinaryOperator::*;

    match operator {
        Power => Value::Number(power(left.to_number(), right.to_number())),
        Multiply => Value::Number(left.to_number() * right.to_number()),
        Divide => Value::Number(left.to_number() / right.to_number()),
        Modulo => Value::Number(left.to_number() % right.to_number()),
        Add => add(left, right),
        Subtract => Value::Number(left.to_number() - right.to_number()),

        ShiftLeft => Value::Number(f64::from(left.to_int32().wrapping_shl(right.to_uint32()))),
        ShiftRight => Value::Number(f64::from(left.to_int32().wrapping_shr(right.to_uint32()))),
        ShiftRightUnsigned => {
            Value::Number(f64::from(left.to_uint32().wrapping_shr(right.to_uint32())))
        }

        LtEq => Value::Bool(matches!(
            left.compare(right),
            Some(Ordering::Less | Ordering::Equal)
        )),
        GtEq => Value::Bool(matches!(
            left.compare(right),
            Some(Ordering::Greater | Ordering::Equal)
        )),
        Lt => Value::Bool(left.compare(right) == Some(Ordering::Less)),
        Gt => Value::Bool(left.compare(right) == Some(Ordering::Greater)),
        Eq => Value::Bool(left.loose_eq(right)),
        NotEq => Value::Bool(!left.loose_eq(right)),

        BitAnd => Value::Number(f64::from(left.to_int32() & right.to_int32())),
        BitXor => Value::Number(f64::from(left.to_int32() ^ right.to_int32())),
        BitOr => Value::Number(f64::from(left.to_int32() | right.to_int32())),

        In => Value::Bool(right.to_items().iter().any(|item| item.strict_eq(left))),
    }
}

/// Combine already-evaluated operands of a boolean chain: the first operand
/// that decides the chain, else the last one, else the neutral boolean.
pub fn apply_logical(operator: LogicalOperator, operands: &[Value]) -> Value {
    operands
        .iter()
        .find(|value| operator.decides(value.is_truthy()))
        .or_else(|| operands.last())
        .cloned()
        .unwrap_or(Value::Bool(operator.neutral()))
}

fn add(left: &Value, right: &Value) -> Value {
    let concatenates = |value: &Value| {
        matches!(
            value,
            Value::String(_) | Value::Array(_) | Value::Object(_)
        )
    };

    if concatenates(left) || concatenates(right) {
        Value::String(format!("{left}{right}"))
    } else {
        Value::Number(left.to_number() + right.to_number())
    }
}

fn power(base: f64, exponent: f64) -> f64 {
    // powf answers 1 for these; scripting semantics answer NaN
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

impl Domain for ValueDomain {
    type Value = Value;

    const NAME: &'static str = "value";

    fn render_literal(&self, value: &Value, _verbatim: bool) -> ExpressionResult<Value> {
        Ok(value.clone())
    }

    fn store(&self, value: Value) -> (Value, bool) {
        (value, false)
    }

    fn unary(&self, operator: UnaryOperator, operand: &Value) -> ExpressionResult<Value> {
        Ok(apply_unary(operator, operand))
    }

    fn binary(
        &self,
        operator: BinaryOperator,
        left: &Value,
        right: &Value,
    ) -> ExpressionResult<Value> {
        Ok(apply_binary(operator, left, right))
    }

    fn logical(&self, operator: LogicalOperator, operands: &[Value]) -> ExpressionResult<Value> {
        Ok(apply_logical(operator, operands))
    }

    fn array(&self, elements: Vec<Value>) -> ExpressionResult<Value> {
        Ok(Value::Array(elements))
    }

    fn conditional(&self, test: &Value, consequent: &Value, alternate: &Value) -> Option<Value> {
        Some(if test.is_truthy() {
            consequent.clone()
        } else {
            alternate.clone()
        })
    }

    fn splice(&self, _shape: &Shape) -> Option<Value> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(operator: BinaryOperator, left: impl Into<Value>, right: impl Into<Value>) -> Value {
        apply_binary(operator, &left.into(), &right.into())
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(binary(BinaryOperator::Power, 2, 10), Value::from(1024));
        assert_eq!(binary(BinaryOperator::Modulo, -7, 3), Value::from(-1));
        assert_eq!(binary(BinaryOperator::Subtract, "10", 4), Value::from(6));
        assert_eq!(binary(BinaryOperator::Multiply, true, 3), Value::from(3));
        assert!(matches!(
            binary(BinaryOperator::Power, 1, f64::INFINITY),
            Value::Number(n) if n.is_nan()
        ));
    }

    #[test]
    fn test_add_concatenates_strings() {
        assert_eq!(binary(BinaryOperator::Add, 1, 2), Value::from(3));
        assert_eq!(binary(BinaryOperator::Add, "1", 2), Value::from("12"));
        assert_eq!(binary(BinaryOperator::Add, 1, "2"), Value::from("12"));
        assert_eq!(binary(BinaryOperator::Add, Value::Null, 1), Value::from(1));
    }

    #[test]
    fn test_shifts() {
        assert_eq!(binary(BinaryOperator::ShiftLeft, 1, 33), Value::from(2));
        assert_eq!(binary(BinaryOperator::ShiftRight, -16, 2), Value::from(-4));
        assert_eq!(
            binary(BinaryOperator::ShiftRightUnsigned, -1, 0),
            Value::from(4_294_967_295u32)
        );
        assert_eq!(binary(BinaryOperator::ShiftRightUnsigned, -16, 28), Value::from(15));
    }

    #[test]
    fn test_bitwise() {
        assert_eq!(binary(BinaryOperator::BitAnd, 6, 3), Value::from(2));
        assert_eq!(binary(BinaryOperator::BitOr, 6, 3), Value::from(7));
        assert_eq!(binary(BinaryOperator::BitXor, 6, 3), Value::from(5));
        assert_eq!(apply_unary(UnaryOperator::BitNot, &Value::from(5)), Value::from(-6));
    }

    #[test]
    fn test_equality_coerces() {
        assert_eq!(binary(BinaryOperator::Eq, 1, "1"), Value::Bool(true));
        assert_eq!(binary(BinaryOperator::NotEq, 1, 2), Value::Bool(true));
        assert_eq!(binary(BinaryOperator::NotEq, 1, "1"), Value::Bool(false));
        assert_eq!(binary(BinaryOperator::Eq, Value::Null, Value::Undefined), Value::Bool(true));
    }

    #[test]
    fn test_comparison() {
        assert_eq!(binary(BinaryOperator::Gt, 500, 100), Value::Bool(true));
        assert_eq!(binary(BinaryOperator::Lt, "a", "b"), Value::Bool(true));
        assert_eq!(binary(BinaryOperator::LtEq, "10", 9), Value::Bool(false));
        assert_eq!(binary(BinaryOperator::GtEq, Value::Undefined, 0), Value::Bool(false));
    }

    #[test]
    fn test_in_is_strict_membership() {
        let countries = Value::from(vec![Value::from("BY"), Value::from("RU")]);
        assert_eq!(binary(BinaryOperator::In, "RU", countries.clone()), Value::Bool(true));
        assert_eq!(binary(BinaryOperator::In, "DE", countries), Value::Bool(false));

        let numbers = Value::from(vec![Value::from(1), Value::from(2)]);
        assert_eq!(binary(BinaryOperator::In, "1", numbers), Value::Bool(false));

        // A scalar right side acts as a one-element sequence
        assert_eq!(binary(BinaryOperator::In, "EUR", "EUR"), Value::Bool(true));
    }

    #[test]
    fn test_unary() {
        assert_eq!(apply_unary(UnaryOperator::Plus, &Value::from("42")), Value::from(42));
        assert_eq!(apply_unary(UnaryOperator::Minus, &Value::from(3)), Value::from(-3));
        assert_eq!(apply_unary(UnaryOperator::Not, &Value::from("")), Value::Bool(true));
    }

    #[test]
    fn test_logical_returns_deciding_value() {
        let values = [Value::from(1), Value::from(0), Value::from(2)];
        assert_eq!(apply_logical(LogicalOperator::And, &values), Value::from(0));
        assert_eq!(apply_logical(LogicalOperator::Or, &values), Value::from(1));

        let values = [Value::from(1), Value::from("x")];
        assert_eq!(apply_logical(LogicalOperator::And, &values), Value::from("x"));

        assert_eq!(apply_logical(LogicalOperator::And, &[]), Value::Bool(true));
        assert_eq!(apply_logical(LogicalOperator::Or, &[]), Value::Bool(false));
    }
}
