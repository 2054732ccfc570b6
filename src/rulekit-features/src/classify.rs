use async_trait::async_trait;
use common_error::{ensure, ExpressionResult};
use rulekit_core::{PathSegment, Scope, Shape, Value};
use rulekit_engine::{EvaluationResult, FeatureDescriptor, FeatureFunction};
use rulekit_optimizer::{SqlFragment, StaticFeature};

/// Transaction types counted as incoming money.
pub const CREDIT_TYPES: &[&str] = &["bank-incoming", "card-incoming", "settlement-incoming"];

/// Transaction types counted as outgoing money.
pub const DEBIT_TYPES: &[&str] = &[
    "bank-outgoing",
    "card-outgoing",
    "settlement-outgoing",
    "invoice-payment",
    "bank-fee",
    "card-fee",
];

/// Tests the current transaction's type against a fixed set.
///
/// At runtime the type is read from `trx.type` in the scope. In the SQL domain
/// the classifier compiles to a membership test on a column.
#[derive(Debug, Clone)]
pub struct TypeClassifier {
    name: &'static str,
    types: &'static [&'static str],
    column: String,
}

impl TypeClassifier {
    pub fn new(name: &'static str, types: &'static [&'static str]) -> Self {
        Self {
            name,
            types,
            column: "t.type".to_string(),
        }
    }

    /// `isCredit()`.
    pub fn credit() -> Self {
        Self::new("isCredit", CREDIT_TYPES)
    }

    /// `isDebit()`.
    pub fn debit() -> Self {
        Self::new("isDebit", DEBIT_TYPES)
    }

    /// Column tested by the SQL form.
    #[must_use]
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = column.into();
        self
    }

    pub fn matches(&self, kind: &str) -> bool {
        self.types.contains(&kind)
    }

    fn descriptor<V>(&self, arity: usize) -> ExpressionResult<FeatureDescriptor<V>> {
        ensure!(arity == 0, TypeError: "{}() takes no arguments, got {}", self.name, arity);
        Ok(FeatureDescriptor::new(1, Shape::scalar("boolean")))
    }

    fn membership(&self) -> String {
        let types: Vec<String> = self
            .types
            .iter()
            .map(|kind| format!("'{}'", kind.replace('\'', "''")))
            .collect();
        format!("{} IN ({})", self.column, types.join(","))
    }
}

#[async_trait]
impl FeatureFunction for TypeClassifier {
    fn describe(&self, arguments: &[EvaluationResult<Value>]) -> ExpressionResult<FeatureDescriptor<Value>> {
        self.descriptor(arguments.len())
    }

    async fn call(&self, scope: &Scope, _arguments: Vec<Value>) -> ExpressionResult<Value> {
        let kind = scope
            .get("trx")
            .and_then(|trx| trx.get(&PathSegment::from("type")))
            .and_then(Value::as_str);
        Ok(Value::Bool(kind.is_some_and(|kind| self.matches(kind))))
    }
}

impl StaticFeature<SqlFragment> for TypeClassifier {
    fn describe(
        &self,
        arguments: &[EvaluationResult<SqlFragment>],
    ) -> ExpressionResult<FeatureDescriptor<SqlFragment>> {
        Ok(self
            .descriptor(arguments.len())?
            .with_value(SqlFragment::text(self.membership())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_sets() {
        assert!(TypeClassifier::credit().matches("settlement-incoming"));
        assert!(!TypeClassifier::credit().matches("card-fee"));
        assert!(TypeClassifier::debit().matches("invoice-payment"));
        assert!(!TypeClassifier::debit().matches("bank-incoming"));
    }

    #[test]
    fn test_membership() {
        let classifier = TypeClassifier::credit().with_column("tx.kind");
        assert_eq!(
            classifier.membership(),
            "tx.kind IN ('bank-incoming','card-incoming','settlement-incoming')"
        );
    }

    #[test]
    fn test_rejects_arguments() {
        assert!(TypeClassifier::credit().descriptor::<Value>(0).is_ok());
        assert!(TypeClassifier::credit().descriptor::<Value>(1).is_err());
    }
}
