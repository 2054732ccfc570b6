//! SQL-domain compilation.

use std::sync::Arc;

use common_error::{ExpressionError, ExpressionResult};
use rulekit_core::{BinaryOperator, Node, Schema, Shape, UnaryOperator, Value};
use rulekit_optimizer::{
    EvaluationResult, FeatureDescriptor, SqlCompiler, SqlFragment, StaticFeature,
};

/// Classifier that compiles to a fixed membership test.
struct TypeIn(&'static [&'static str]);

impl StaticFeature<SqlFragment> for TypeIn {
    fn describe(
        &self,
        _arguments: &[EvaluationResult<SqlFragment>],
    ) -> ExpressionResult<FeatureDescriptor<SqlFragment>> {
        let types: Vec<String> = self.0.iter().map(|t| format!("'{t}'")).collect();
        Ok(FeatureDescriptor::new(1, Shape::scalar("boolean"))
            .with_value(SqlFragment::text(format!("t.type IN ({})", types.join(",")))))
    }
}

fn schema() -> Schema {
    Schema::from_json(serde_json::json!({
        "limit": { "type": "number" },
        "trx": {
            "type": { "type": "placeholder", "value": ":type" },
            "label": { "type": "placeholder", "value": ":label" },
            "amount": { "type": "placeholder", "value": ":amount" },
            "currency": { "type": "placeholder", "value": ":currency" },
            "country": { "type": "placeholder", "value": ":country" }
        },
        "past": {
            "id": { "type": "field", "value": "t.id" },
            "label": { "type": "field", "value": "t.label" },
            "amount": { "type": "field", "value": "t.amount" },
            "currency": { "type": "field", "value": "t.currency" },
            "country": { "type": "field", "value": "t.country" }
        },
        "amount": { "type": "field", "value": "t.amount" }
    }))
    .unwrap()
}

fn compiler() -> SqlCompiler {
    let mut compiler = SqlCompiler::new(schema());
    compiler.add_feature("isCredit", Arc::new(TypeIn(&["bank-incoming", "card-incoming"])));
    compiler
}

fn past(field: &str) -> Node {
    Node::member(Node::identifier("past"), [field])
}

fn trx(field: &str) -> Node {
    Node::member(Node::identifier("trx"), [field])
}

#[test]
fn test_scalar_literal_is_quoted() {
    assert_eq!(compiler().compile_to_sql(&Node::literal(5)).unwrap(), "'5'");
    assert_eq!(compiler().compile_to_sql(&Node::literal("EUR")).unwrap(), "'EUR'");
}

#[test]
fn test_field_is_emitted_raw() {
    assert_eq!(compiler().compile_to_sql(&past("amount")).unwrap(), "t.amount");
    assert_eq!(compiler().compile_to_sql(&Node::identifier("amount")).unwrap(), "t.amount");
    assert_eq!(compiler().compile_to_sql(&trx("amount")).unwrap(), ":amount");
}

#[test]
fn test_comparison() {
    let ast = Node::binary(BinaryOperator::Gt, past("amount"), Node::literal(100));
    assert_eq!(compiler().compile_to_sql(&ast).unwrap(), "(t.amount>'100')");
}

#[test]
fn test_in_literal_list() {
    let ast = Node::binary(
        BinaryOperator::In,
        past("id"),
        Node::literal(vec![Value::from(1), Value::from(2)]),
    );
    assert_eq!(compiler().compile_to_sql(&ast).unwrap(), "t.id IN (1,2)");
}

#[test]
fn test_in_array_expression() {
    let ast = Node::binary(
        BinaryOperator::In,
        trx("country"),
        Node::array(vec![past("country"), Node::literal("DE")]),
    );
    assert_eq!(
        compiler().compile_to_sql(&ast).unwrap(),
        ":country IN (t.country,'DE')"
    );
}

#[test]
fn test_in_scalar_is_equality() {
    let ast = Node::binary(BinaryOperator::In, past("currency"), trx("currency"));
    assert_eq!(compiler().compile_to_sql(&ast).unwrap(), "t.currency=:currency");
}

#[test]
fn test_unsigned_shift_is_unsupported() {
    let ast = Node::binary(BinaryOperator::ShiftRightUnsigned, past("amount"), Node::literal(1));
    let err = compiler().compile_to_sql(&ast).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        ExpressionError::UnsupportedOperator { operator, domain: "sql" } if operator == ">>>"
    ));
}

#[test]
fn test_scalar_schema_entry_is_not_constant() {
    let ast = Node::binary(BinaryOperator::Gt, past("amount"), Node::identifier("limit"));
    let err = compiler().compile_to_sql(&ast).unwrap_err();
    assert!(matches!(err, ExpressionError::NotConstant(_)));
}

#[test]
fn test_credit_rule() {
    let ast = Node::and(vec![
        Node::call("isCredit", vec![]),
        Node::binary(BinaryOperator::Gt, past("amount"), Node::literal(100)),
    ]);

    assert_eq!(
        compiler().compile_to_sql(&ast).unwrap(),
        "(t.type IN ('bank-incoming','card-incoming')) AND (t.amount>'100')"
    );
}

#[test]
fn test_absorption_of_plain_constants() {
    let compiler = compiler();
    let gt = Node::binary(BinaryOperator::Gt, past("amount"), Node::literal(1));

    let ast = Node::and(vec![Node::literal(true), gt.clone()]);
    assert_eq!(compiler.compile_to_sql(&ast).unwrap(), "(t.amount>'1')");

    let ast = Node::and(vec![gt.clone(), Node::literal(false)]);
    assert_eq!(compiler.compile_to_sql(&ast).unwrap(), "FALSE");

    let ast = Node::or(vec![gt, Node::literal(1)]);
    assert_eq!(compiler.compile_to_sql(&ast).unwrap(), "'1'");
}

#[test]
fn test_nested_chains() {
    let ast = Node::or(vec![
        Node::binary(BinaryOperator::Eq, past("currency"), Node::literal("EUR")),
        Node::and(vec![
            Node::binary(BinaryOperator::Eq, past("currency"), Node::literal("USD")),
            Node::binary(BinaryOperator::Lt, past("amount"), Node::literal(50)),
        ]),
    ]);

    assert_eq!(
        compiler().compile_to_sql(&ast).unwrap(),
        "(t.currency='EUR') OR ((t.currency='USD') AND (t.amount<'50'))"
    );
}

#[test]
fn test_operators_render() {
    let compiler = compiler();

    let ast = Node::binary(BinaryOperator::Power, past("amount"), Node::literal(2));
    assert_eq!(compiler.compile_to_sql(&ast).unwrap(), "POWER(t.amount,'2')");

    let ast = Node::binary(
        BinaryOperator::NotEq,
        past("country"),
        trx("country"),
    );
    assert_eq!(compiler.compile_to_sql(&ast).unwrap(), "(t.country!=:country)");

    let ast = Node::unary(
        UnaryOperator::Not,
        Node::binary(BinaryOperator::Eq, past("label"), trx("label")),
    );
    assert_eq!(compiler.compile_to_sql(&ast).unwrap(), "NOT ((t.label=:label))");
}

#[test]
fn test_conditional_renders_case() {
    let ast = Node::conditional(
        Node::binary(BinaryOperator::Gt, past("amount"), Node::literal(100)),
        Node::literal("big"),
        Node::literal("small"),
    );
    assert_eq!(
        compiler().compile_to_sql(&ast).unwrap(),
        "CASE WHEN (t.amount>'100') THEN 'big' ELSE 'small' END"
    );
}

#[test]
fn test_constant_conditional_selects_branch() {
    let ast = Node::conditional(Node::literal(0), past("amount"), past("currency"));
    assert_eq!(compiler().compile_to_sql(&ast).unwrap(), "t.currency");
}

#[test]
fn test_revalidation_is_a_fixed_point() {
    let compiler = compiler();
    let ast = Node::and(vec![
        Node::call("isCredit", vec![]),
        Node::binary(BinaryOperator::In, trx("country"), Node::literal(vec![Value::from("RU")])),
    ]);

    let once = compiler.validate(&ast).unwrap();
    let twice = compiler.validate(&once).unwrap();
    assert_eq!(once, twice);
    assert_eq!(
        compiler.compile_to_sql(&once).unwrap(),
        compiler.compile_to_sql(&ast).unwrap()
    );
}

#[test]
fn test_in_mixed_array_keeps_numbers_bare() {
    let ast = Node::binary(
        BinaryOperator::In,
        trx("amount"),
        Node::array(vec![past("amount"), Node::literal(5)]),
    );
    assert_eq!(compiler().compile_to_sql(&ast).unwrap(), ":amount IN (t.amount,5)");
}

#[test]
fn test_input_literal_cannot_inject_sql() {
    let ast = Node::from_json(serde_json::json!({
        "type": "BinaryExpression",
        "operator": "==",
        "left": { "type": "MemberExpression", "object": { "type": "Identifier", "name": "past" }, "path": ["country"] },
        "right": { "type": "Literal", "value": "'x' OR 1=1", "verbatim": true }
    }))
    .unwrap();
    assert_eq!(
        compiler().compile_to_sql(&ast).unwrap(),
        "(t.country='''x'' OR 1=1')"
    );
}

#[test]
fn test_quotes_are_escaped() {
    let ast = Node::binary(BinaryOperator::Eq, past("label"), Node::literal("O'Brien"));
    assert_eq!(compiler().compile_to_sql(&ast).unwrap(), "(t.label='O''Brien')");
}
