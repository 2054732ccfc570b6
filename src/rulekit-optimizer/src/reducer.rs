//! The generic reducer.
//!
//! `Optimizer<D>` rewrites an expression tree bottom-up: every node is
//! validated against the schema and feature registry, gets a cost weight, and
//! is replaced in place by a literal once all of its inputs are constant.
//! Boolean chains are additionally flattened and stripped of constant
//! operands that cannot change their outcome.

use std::collections::HashMap;
use std::sync::Arc;

use common_config::OptimizerConfig;
use common_error::{ExpressionError, ExpressionResult};
use log::{debug, trace};
use rulekit_core::{Node, NodeKind, PathSegment, Schema, TypeEstimate, Value};

use crate::domain::{Domain, SqlDomain, ValueDomain};
use crate::feature::StaticFeature;
use crate::result::{EvaluationResult, Origin};

/// Optimizer folding to concrete values.
pub type ValueOptimizer = Optimizer<ValueDomain>;

/// Optimizer folding to SQL text.
pub type SqlOptimizer = Optimizer<SqlDomain>;

/// Schema-bound static optimizer for one domain.
pub struct Optimizer<D: Domain> {
    domain: D,
    schema: Schema,
    features: HashMap<String, Arc<dyn StaticFeature<D::Value>>>,
    config: OptimizerConfig,
}

/// What a node turns into once its children are reduced.
enum Step<V> {
    /// The node stays as it is.
    Done(EvaluationResult<V>),
    /// The node folds to a domain value.
    Fold(V),
    /// The node folds to a plain literal.
    FoldLiteral(Value),
    /// The node is replaced by one of its (already reduced) descendants.
    Replace(Node),
}

/// Payload of a literal that participates in constant decisions. Verbatim
/// literals carry domain text and stay opaque.
fn constant(node: &Node) -> Option<&Value> {
    match node.as_literal() {
        Some((value, false)) => Some(value),
        _ => None,
    }
}

fn describe(node: &Node) -> String {
    serde_json::to_string(node).unwrap_or_else(|_| node.to_string())
}

fn member_path(object: &Node, path: &[PathSegment]) -> String {
    let suffix: String = path.iter().map(ToString::to_string).collect();
    format!("{object}{suffix}")
}

fn total_weight<'a>(nodes: impl IntoIterator<Item = &'a Node>) -> u32 {
    nodes
        .into_iter()
        .map(|node| node.weight)
        .fold(0, u32::saturating_add)
}

impl<D: Domain + Default> Optimizer<D> {
    /// Create an optimizer bound to `schema`.
    pub fn new(schema: Schema) -> Self {
        Self::with_domain(D::default(), schema)
    }
}

impl<D: Domain> Optimizer<D> {
    /// Create an optimizer for an explicit domain instance.
    pub fn with_domain(domain: D, schema: Schema) -> Self {
        Self {
            domain,
            schema,
            features: HashMap::new(),
            config: OptimizerConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: OptimizerConfig) -> Self {
        self.config = config;
        self
    }

    /// Register the static side of a feature.
    pub fn add_feature(&mut self, name: impl Into<String>, feature: Arc<dyn StaticFeature<D::Value>>) {
        let name = name.into();
        debug!("Registered {} feature `{name}`", D::NAME);
        self.features.insert(name, feature);
    }

    /// The bound schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The active configuration.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// The operator semantics in use.
    pub fn domain(&self) -> &D {
        &self.domain
    }

    /// Validate and fold a copy of `ast`.
    pub fn validate(&self, ast: &Node) -> ExpressionResult<Node> {
        self.compile(ast).map(|(node, _)| node)
    }

    /// Validate and fold a copy of `ast`, also returning the root result.
    pub fn compile(&self, ast: &Node) -> ExpressionResult<(Node, EvaluationResult<D::Value>)> {
        let mut node = ast.clone();
        let result = self.reduce_at(&mut node, 0)?;
        debug!(
            "Validated {} rule: weight={}, type={}, constant={}",
            D::NAME,
            result.weight,
            result.type_estimate,
            result.is_literal()
        );
        Ok((node, result))
    }

    /// Reduce `node` in place. On failure `node` is left untouched.
    pub fn reduce(&self, node: &mut Node) -> ExpressionResult<EvaluationResult<D::Value>> {
        let (reduced, result) = self.compile(node)?;
        *node = reduced;
        Ok(result)
    }

    fn reduce_at(&self, node: &mut Node, depth: usize) -> ExpressionResult<EvaluationResult<D::Value>> {
        let result = if depth > self.config.max_depth {
            Err(ExpressionError::DepthExceeded(self.config.max_depth))
        } else {
            self.reduce_node(node, depth)
        };
        result.map_err(|err| ExpressionError::syntax(describe(node), err))
    }

    fn render_all(&self, nodes: &[Node]) -> ExpressionResult<Vec<D::Value>> {
        self.render_with(nodes, D::render_literal)
    }

    fn render_with(
        &self,
        nodes: &[Node],
        render: fn(&D, &Value, bool) -> ExpressionResult<D::Value>,
    ) -> ExpressionResult<Vec<D::Value>> {
        nodes
            .iter()
            .map(|node| match node.as_literal() {
                Some((value, verbatim)) => render(&self.domain, value, verbatim),
                None => Err(ExpressionError::not_constant(node.to_string())),
            })
            .collect()
    }

    fn reduce_node(&self, node: &mut Node, depth: usize) -> ExpressionResult<EvaluationResult<D::Value>> {
        let step = match &mut node.kind {
            NodeKind::Literal { value, verbatim } => {
                node.weight = 0;
                let rendered = self.domain.render_literal(value, *verbatim)?;
                Step::Done(EvaluationResult::literal(
                    TypeEstimate::named(value.type_name()),
                    rendered,
                ))
            }

            NodeKind::Identifier { name } => {
                node.weight = 1;
                if let Some(feature) = self.features.get(name.as_str()) {
                    Step::Done(EvaluationResult {
                        type_estimate: TypeEstimate::named("function"),
                        weight: 1,
                        origin: Origin::Feature {
                            name: name.clone(),
                            feature: Arc::clone(feature),
                        },
                    })
                } else if let Some(shape) = self.schema.get(name.as_str()) {
                    match self.domain.splice(shape) {
                        Some(value) => Step::Fold(value),
                        None => Step::Done(EvaluationResult {
                            type_estimate: TypeEstimate::named(shape.type_name()),
                            weight: 1,
                            origin: Origin::Identifier(shape.clone()),
                        }),
                    }
                } else {
                    return Err(ExpressionError::unknown_identifier(name.clone()));
                }
            }

            NodeKind::UnaryExpression { operator, operand } => {
                let result = self.reduce_at(operand, depth + 1)?;
                node.weight = result.weight.saturating_add(1);
                let folded = match result.literal_value() {
                    Some(value) => Some(self.domain.unary(*operator, value)?),
                    None => None,
                };
                match folded {
                    Some(value) => Step::Fold(value),
                    None => Step::Done(EvaluationResult::computed(
                        result.type_estimate,
                        node.weight,
                        None,
                    )),
                }
            }

            NodeKind::BinaryExpression {
                operator,
                left,
                right,
            } => {
                let left = self.reduce_at(left, depth + 1)?;
                let right = self.reduce_at(right, depth + 1)?;
                node.weight = left.weight.saturating_add(right.weight).saturating_add(1);
                let folded = match (left.literal_value(), right.literal_value()) {
                    (Some(l), Some(r)) => Some(self.domain.binary(*operator, l, r)?),
                    _ => None,
                };
                match folded {
                    Some(value) => Step::Fold(value),
                    None => Step::Done(EvaluationResult::computed(
                        TypeEstimate::union([left.type_estimate, right.type_estimate]),
                        node.weight,
                        None,
                    )),
                }
            }

            NodeKind::LogicalExpression { operator, operands } => {
                let operator = *operator;
                for operand in operands.iter_mut() {
                    self.reduce_at(operand, depth + 1)?;
                }

                if operands.iter().all(|operand| constant(operand).is_some()) {
                    let values = self.render_all(operands)?;
                    Step::Fold(self.domain.logical(operator, &values)?)
                } else {
                    let mut flat = Vec::with_capacity(operands.len());
                    for operand in std::mem::take(operands) {
                        let weight = operand.weight;
                        match operand.kind {
                            NodeKind::LogicalExpression {
                                operator: inner,
                                operands: nested,
                            } if self.config.enable_flattening && inner == operator => {
                                trace!("Flattening nested `{operator}` chain");
                                flat.extend(nested);
                            }
                            kind => flat.push(Node { kind, weight }),
                        }
                    }

                    let mut kept = Vec::with_capacity(flat.len());
                    let mut decided = None;
                    for operand in flat {
                        let truthy = match constant(&operand) {
                            Some(value) if self.config.enable_absorption => Some(value.is_truthy()),
                            _ => None,
                        };
                        match truthy {
                            Some(truthy) if operator.decides(truthy) => {
                                trace!("Operand {operand} decides `{operator}` chain");
                                decided = Some(operand);
                                break;
                            }
                            Some(_) => trace!("Dropping neutral operand {operand} of `{operator}` chain"),
                            None => kept.push(operand),
                        }
                    }

                    if let Some(deciding) = decided {
                        Step::Replace(deciding)
                    } else if kept.is_empty() {
                        Step::FoldLiteral(Value::Bool(operator.neutral()))
                    } else if kept.len() == 1 {
                        match kept.pop() {
                            Some(single) => Step::Replace(single),
                            None => Step::FoldLiteral(Value::Bool(operator.neutral())),
                        }
                    } else if kept.iter().all(Node::is_literal) {
                        let values = self.render_all(&kept)?;
                        Step::Fold(self.domain.logical(operator, &values)?)
                    } else {
                        node.weight = total_weight(&kept).saturating_add(1);
                        *operands = kept;
                        Step::Done(EvaluationResult::computed(
                            TypeEstimate::named("boolean"),
                            node.weight,
                            None,
                        ))
                    }
                }
            }

            NodeKind::ArrayExpression { elements } => {
                let mut estimates = Vec::with_capacity(elements.len());
                for element in elements.iter_mut() {
                    estimates.push(self.reduce_at(element, depth + 1)?.type_estimate);
                }

                if elements.iter().all(|element| constant(element).is_some()) {
                    Step::FoldLiteral(Value::Array(
                        elements.iter().filter_map(constant).cloned().collect(),
                    ))
                } else if elements.iter().all(Node::is_literal) {
                    Step::Fold(self.domain.array(self.render_with(elements, D::render_element)?)?)
                } else {
                    node.weight = total_weight(elements.iter()).saturating_add(1);
                    trace!("Array element types: {}", TypeEstimate::union(estimates));
                    Step::Done(EvaluationResult::computed(
                        TypeEstimate::named("array"),
                        node.weight,
                        None,
                    ))
                }
            }

            NodeKind::ConditionalExpression {
                test,
                consequent,
                alternate,
            } => {
                // Both branches are validated even though only one runs
                let test_result = self.reduce_at(test, depth + 1)?;
                let consequent_result = self.reduce_at(consequent, depth + 1)?;
                let alternate_result = self.reduce_at(alternate, depth + 1)?;

                let folded = match (
                    test_result.literal_value(),
                    consequent_result.literal_value(),
                    alternate_result.literal_value(),
                ) {
                    (Some(t), Some(c), Some(a)) if constant(test).is_none() => {
                        self.domain.conditional(t, c, a)
                    }
                    _ => None,
                };

                if let Some(truthy) = constant(test).map(Value::is_truthy) {
                    trace!("Selecting {} branch", if truthy { "consequent" } else { "alternate" });
                    let branch = if truthy { consequent } else { alternate };
                    Step::Replace(std::mem::replace(&mut **branch, Node::literal(Value::Undefined)))
                } else if let Some(value) = folded {
                    Step::Fold(value)
                } else {
                    node.weight = test_result
                        .weight
                        .saturating_add(consequent_result.weight.max(alternate_result.weight))
                        .saturating_add(1);
                    Step::Done(EvaluationResult::computed(
                        TypeEstimate::union([
                            consequent_result.type_estimate,
                            alternate_result.type_estimate,
                        ]),
                        node.weight,
                        None,
                    ))
                }
            }

            NodeKind::SequenceExpression { expressions } => {
                let mut last = None;
                for expression in expressions.iter_mut() {
                    last = Some(self.reduce_at(expression, depth + 1)?);
                }

                match last {
                    Some(result) if !result.is_literal() => {
                        node.weight = total_weight(expressions.iter()).saturating_add(1);
                        let shape = result.shape().cloned();
                        Step::Done(EvaluationResult::computed(
                            result.type_estimate,
                            node.weight,
                            shape,
                        ))
                    }
                    _ => match expressions.pop() {
                        Some(last) => Step::Replace(last),
                        None => Step::FoldLiteral(Value::Undefined),
                    },
                }
            }

            NodeKind::CallExpression { callee, arguments } => {
                let callee_result = self.reduce_at(callee, depth + 1)?;
                let mut weight = callee_result.weight.saturating_add(1);
                let Origin::Feature { name, feature } = callee_result.origin else {
                    return Err(ExpressionError::not_callable(format!(
                        "`{callee}` is not a feature"
                    )));
                };

                let compiler = feature.argument_compiler();
                let mut results = Vec::with_capacity(arguments.len());
                for argument in arguments.iter_mut() {
                    if let Some(compiler) = &compiler {
                        let text = compiler
                            .compile_argument(argument)
                            .map_err(|err| ExpressionError::syntax(describe(argument), err))?;
                        *argument = Node::verbatim(text);
                    }
                    let result = self.reduce_at(argument, depth + 1)?;
                    weight = weight.saturating_add(result.weight);
                    results.push(result);
                }

                let descriptor = feature.describe(&results)?;
                weight = weight.saturating_add(descriptor.weight);
                trace!("Described call to `{name}`: weight={weight}");

                match descriptor.value {
                    Some(value) => Step::Fold(value),
                    None => {
                        node.weight = weight;
                        Step::Done(EvaluationResult::computed(
                            TypeEstimate::named(descriptor.returns.type_name()),
                            weight,
                            Some(descriptor.returns),
                        ))
                    }
                }
            }

            NodeKind::MemberExpression { object, path } => {
                let target = self.reduce_at(object, depth + 1)?;
                let weight = target.weight.saturating_add(1);

                if let Some((value, verbatim)) = object.as_literal() {
                    if verbatim {
                        return Err(ExpressionError::type_error(format!(
                            "cannot access members of compiled {} text",
                            D::NAME
                        )));
                    }
                    let element = value
                        .get_path(path)
                        .cloned()
                        .ok_or_else(|| ExpressionError::unknown_path(member_path(object, path)))?;
                    Step::FoldLiteral(element)
                } else {
                    let declared = match &target.origin {
                        Origin::Identifier(shape) | Origin::Computed(Some(shape)) => Some(shape),
                        Origin::Feature { name, .. } => {
                            return Err(ExpressionError::type_error(format!(
                                "feature `{name}` has no members"
                            )));
                        }
                        Origin::Literal(_) | Origin::Computed(None) => None,
                    };

                    match declared {
                        Some(shape) => {
                            let member = shape.lookup(path).ok_or_else(|| {
                                ExpressionError::unknown_path(member_path(object, path))
                            })?;
                            match self.domain.splice(member) {
                                Some(value) => Step::Fold(value),
                                None => {
                                    node.weight = weight;
                                    Step::Done(EvaluationResult {
                                        type_estimate: TypeEstimate::named(member.type_name()),
                                        weight,
                                        origin: Origin::Identifier(member.clone()),
                                    })
                                }
                            }
                        }
                        None => {
                            node.weight = weight;
                            Step::Done(EvaluationResult::computed(
                                TypeEstimate::named("any"),
                                weight,
                                None,
                            ))
                        }
                    }
                }
            }
        };

        match step {
            Step::Done(result) => Ok(result),
            Step::Fold(value) => {
                let (value, verbatim) = self.domain.store(value);
                trace!("Folded {} into {value}", node.type_name());
                node.set_literal(value, verbatim);
                self.reduce_node(node, depth)
            }
            Step::FoldLiteral(value) => {
                trace!("Folded {} into {value}", node.type_name());
                node.set_literal(value, false);
                self.reduce_node(node, depth)
            }
            Step::Replace(replacement) => {
                *node = replacement;
                self.reduce_node(node, depth)
            }
        }
    }
}
