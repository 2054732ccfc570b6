//! Sample schemas, scope and rules.

use std::sync::Arc;

use common_error::ExpressionResult;
use rulekit_core::{Node, Schema, Scope};
use rulekit_engine::Engine;
use rulekit_features::{register_features, register_sql_features, QueryRunner};
use rulekit_optimizer::SqlCompiler;
use serde_json::json;

/// Schema of the scope handed to the engine: the transaction under review and
/// a list of prohibited countries.
pub fn value_schema() -> ExpressionResult<Schema> {
    Schema::from_json(json!({
        "prohibitedCountries": { "type": "array" },
        "trx": {
            "type": { "type": "string" },
            "label": { "type": "string" },
            "amount": { "type": "number" },
            "currency": { "type": "string" },
            "country": { "type": "string" }
        }
    }))
}

/// Schema used to compile aggregate arguments: `trx.*` binds to statement
/// parameters, `past.*` to columns of past transactions, `lastMonth` to the
/// default aggregation window.
pub fn sql_schema() -> ExpressionResult<Schema> {
    Schema::from_json(json!({
        "trx": {
            "type": { "type": "placeholder", "value": ":type" },
            "label": { "type": "placeholder", "value": ":label" },
            "amount": { "type": "placeholder", "value": ":amount" },
            "currency": { "type": "placeholder", "value": ":currency" },
            "country": { "type": "placeholder", "value": ":country" }
        },
        "past": {
            "type": { "type": "field", "value": "t.type" },
            "label": { "type": "field", "value": "t.label" },
            "amount": { "type": "field", "value": "t.amount" },
            "currency": { "type": "field", "value": "t.currency" },
            "country": { "type": "field", "value": "t.country" }
        },
        "lastMonth": { "type": "field", "value": "INTERVAL 30 DAY" }
    }))
}

pub fn sample_scope() -> ExpressionResult<Scope> {
    Scope::from_json(json!({
        "prohibitedCountries": ["BY", "RU"],
        "trx": {
            "type": "bank-incoming",
            "label": "sepa-incoming",
            "amount": 500,
            "currency": "EUR",
            "country": "RU"
        }
    }))
}

/// SQL compiler over [`sql_schema`] with the classifiers registered.
pub fn create_compiler() -> ExpressionResult<SqlCompiler> {
    let mut compiler = SqlCompiler::new(sql_schema()?);
    register_sql_features(&mut compiler);
    Ok(compiler)
}

/// Engine over [`value_schema`] with every feature registered.
pub fn create_engine(runner: Arc<dyn QueryRunner>) -> ExpressionResult<Engine> {
    let mut engine = Engine::new(value_schema()?);
    register_features(&mut engine, Arc::new(create_compiler()?), runner);
    Ok(engine)
}

/// Named sample rules, as a parser would emit them.
pub fn sample_rules() -> ExpressionResult<Vec<(&'static str, Node)>> {
    let trx = |field: &str| {
        json!({
            "type": "MemberExpression",
            "object": { "type": "Identifier", "name": "trx" },
            "path": [field]
        })
    };
    let past = |field: &str| {
        json!({
            "type": "MemberExpression",
            "object": { "type": "Identifier", "name": "past" },
            "path": [field]
        })
    };

    let rules = [
        (
            "large credit",
            json!({
                "type": "LogicalExpression",
                "operator": "&&",
                "operands": [
                    { "type": "CallExpression", "callee": { "type": "Identifier", "name": "isCredit" }, "arguments": [] },
                    { "type": "BinaryExpression", "operator": ">", "left": trx("amount"), "right": { "type": "Literal", "value": 100 } }
                ]
            }),
        ),
        (
            "prohibited country",
            json!({
                "type": "BinaryExpression",
                "operator": "in",
                "left": trx("country"),
                "right": { "type": "Identifier", "name": "prohibitedCountries" }
            }),
        ),
        (
            "constant folding",
            json!({
                "type": "LogicalExpression",
                "operator": "or",
                "operands": [
                    { "type": "BinaryExpression", "operator": "==", "left": { "type": "Literal", "value": 1 }, "right": { "type": "Literal", "value": "2" } },
                    { "type": "BinaryExpression", "operator": "<>", "left": trx("currency"), "right": { "type": "Literal", "value": "EUR" } }
                ]
            }),
        ),
        (
            "repeated country",
            json!({
                "type": "CallExpression",
                "callee": { "type": "Identifier", "name": "count" },
                "arguments": [
                    { "type": "BinaryExpression", "operator": "=", "left": past("country"), "right": trx("country") },
                    { "type": "Identifier", "name": "lastMonth" }
                ]
            }),
        ),
    ];

    rules
        .into_iter()
        .map(|(name, ast)| Ok((name, Node::from_json(ast)?)))
        .collect()
}

#[cfg(test)]
mod tests {
    use rulekit_features::StatementText;

    use super::*;

    #[test]
    fn test_samples_validate() {
        let engine = create_engine(Arc::new(StatementText)).unwrap();
        for (name, ast) in sample_rules().unwrap() {
            assert!(engine.validate(&ast).is_ok(), "sample `{name}` failed to validate");
        }
    }
}
