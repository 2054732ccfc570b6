//! Async tree-walking interpreter over validated expressions.

use common_config::InterpreterConfig;
use common_error::{ExpressionError, ExpressionResult};
use futures::future::{try_join_all, BoxFuture};
use futures::{stream, FutureExt, StreamExt, TryStreamExt};
use log::trace;
use rulekit_core::{LogicalOperator, Node, NodeKind, Scope, Value};
use rulekit_optimizer::domain::{apply_binary, apply_logical, apply_unary};

use crate::feature::FeatureRegistry;

/// Evaluates validated trees against a scope.
///
/// The interpreter borrows its registry and configuration, so evaluations of
/// the same tree against different scopes can run concurrently.
pub struct Interpreter<'a> {
    features: &'a FeatureRegistry,
    config: &'a InterpreterConfig,
}

impl<'a> Interpreter<'a> {
    pub fn new(features: &'a FeatureRegistry, config: &'a InterpreterConfig) -> Self {
        Self { features, config }
    }

    /// Evaluate `node` against `scope`.
    ///
    /// Expects a tree produced by the value-domain optimizer: weights drive
    /// logical operand order and unvalidated trees get no static guarantees.
    pub fn value_of<'s>(&'s self, scope: &'s Scope, node: &'s Node) -> BoxFuture<'s, ExpressionResult<Value>> {
        async move {
            match &node.kind {
                NodeKind::Literal { value, .. } => Ok(value.clone()),
                NodeKind::Identifier { name } => {
                    if self.features.contains(name) {
                        return Err(ExpressionError::not_callable(format!(
                            "feature `{name}` can only be called"
                        )));
                    }
                    Ok(scope.get(name).cloned().unwrap_or_default())
                }
                NodeKind::UnaryExpression { operator, operand } => {
                    let operand = self.value_of(scope, operand).await?;
                    Ok(apply_unary(*operator, &operand))
                }
                NodeKind::BinaryExpression { operator, left, right } => {
                    let (left, right) =
                        futures::try_join!(self.value_of(scope, left), self.value_of(scope, right))?;
                    Ok(apply_binary(*operator, &left, &right))
                }
                NodeKind::LogicalExpression { operator, operands } => {
                    self.logical(scope, *operator, operands).await
                }
                NodeKind::ArrayExpression { elements } => Ok(Value::Array(self.all(scope, elements).await?)),
                NodeKind::ConditionalExpression {
                    test,
                    consequent,
                    alternate,
                } => {
                    if self.value_of(scope, test).await?.is_truthy() {
                        self.value_of(scope, consequent).await
                    } else {
                        self.value_of(scope, alternate).await
                    }
                }
                NodeKind::SequenceExpression { expressions } => {
                    let mut last = Value::Undefined;
                    for expression in expressions {
                        last = self.value_of(scope, expression).await?;
                    }
                    Ok(last)
                }
                NodeKind::CallExpression { callee, arguments } => self.call(scope, callee, arguments).await,
                NodeKind::MemberExpression { object, path } => {
                    let target = self.value_of(scope, object).await?;
                    match target.get_path(path) {
                        Some(value) => Ok(value.clone()),
                        None if self.config.strict_members => {
                            let path: String = path.iter().map(ToString::to_string).collect();
                            Err(ExpressionError::unknown_path(format!("{object}{path}")))
                        }
                        None => Ok(Value::Undefined),
                    }
                }
            }
        }
        .boxed()
    }

    /// Cheapest operands first, stopping at the first deciding value.
    async fn logical(&self, scope: &Scope, operator: LogicalOperator, operands: &[Node]) -> ExpressionResult<Value> {
        if operands.is_empty() {
            return Ok(apply_logical(operator, &[]));
        }

        let mut ordered: Vec<&Node> = operands.iter().collect();
        ordered.sort_by_key(|operand| operand.weight);

        let mut last = Value::Undefined;
        for (index, operand) in ordered.iter().enumerate() {
            let value = self.value_of(scope, operand).await?;
            if operator.decides(value.is_truthy()) {
                trace!(
                    "`{operator}` decided after {} of {} operands",
                    index + 1,
                    ordered.len()
                );
                return Ok(value);
            }
            last = value;
        }
        Ok(last)
    }

    /// Evaluate independent subtrees concurrently, preserving order.
    async fn all(&self, scope: &Scope, nodes: &[Node]) -> ExpressionResult<Vec<Value>> {
        let pending: Vec<_> = nodes.iter().map(|node| self.value_of(scope, node)).collect();
        match self.config.max_fanout {
            Some(limit) => stream::iter(pending).buffered(limit.max(1)).try_collect().await,
            None => try_join_all(pending).await,
        }
    }

    async fn call(&self, scope: &Scope, callee: &Node, arguments: &[Node]) -> ExpressionResult<Value> {
        let feature = match &callee.kind {
            NodeKind::Identifier { name } => self.features.get(name).map(|feature| (name, feature)),
            _ => None,
        };
        let Some((name, feature)) = feature else {
            return Err(ExpressionError::not_callable(format!("`{callee}` is not a feature")));
        };

        let arguments = self.all(scope, arguments).await?;
        trace!("Calling `{name}` with {} arguments", arguments.len());
        feature
            .call(scope, arguments)
            .await
            .map_err(|err| ExpressionError::feature_failed(name.clone(), err))
    }
}
