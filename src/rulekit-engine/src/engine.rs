use std::sync::Arc;

use common_config::{InterpreterConfig, RuleConfig};
use common_error::ExpressionResult;
use log::debug;
use rulekit_core::{Node, Schema, Scope, Value};
use rulekit_optimizer::{EvaluationResult, ValueOptimizer};

use crate::feature::{FeatureFunction, FeatureRegistry, StaticSide};
use crate::interpreter::Interpreter;

/// Validates rules against a schema and evaluates them against scopes.
pub struct Engine {
    /// Value-domain optimizer sharing this engine's features.
    optimizer: ValueOptimizer,
    /// Runtime side of every registered feature.
    features: FeatureRegistry,
    /// Interpreter settings.
    config: InterpreterConfig,
}

impl Engine {
    pub fn new(schema: Schema) -> Self {
        Self {
            optimizer: ValueOptimizer::new(schema),
            features: FeatureRegistry::new(),
            config: InterpreterConfig::default(),
        }
    }

    /// Apply a configuration to both the optimizer and the interpreter.
    #[must_use]
    pub fn with_config(mut self, config: RuleConfig) -> Self {
        self.optimizer = self.optimizer.with_config(config.optimizer);
        self.config = config.interpreter;
        self
    }

    /// Register a feature for validation and evaluation alike. The first
    /// registration of a name is kept.
    pub fn add_feature(&mut self, name: impl Into<String>, feature: Arc<dyn FeatureFunction>) {
        let name = name.into();
        let side = StaticSide(Arc::clone(&feature));
        if self.features.register(name.clone(), feature) {
            self.optimizer.add_feature(name, Arc::new(side));
        }
    }

    pub fn optimizer(&self) -> &ValueOptimizer {
        &self.optimizer
    }

    pub fn features(&self) -> &FeatureRegistry {
        &self.features
    }

    pub fn schema(&self) -> &Schema {
        self.optimizer.schema()
    }

    /// Validate and fold `ast`. The result can be evaluated any number of
    /// times with [`Engine::value_of`].
    pub fn validate(&self, ast: &Node) -> ExpressionResult<Node> {
        self.optimizer.validate(ast)
    }

    /// Validate `ast` and report its static estimate alongside the tree.
    pub fn compile(&self, ast: &Node) -> ExpressionResult<(Node, EvaluationResult<Value>)> {
        self.optimizer.compile(ast)
    }

    /// Evaluate an already validated tree.
    pub async fn value_of(&self, scope: &Scope, node: &Node) -> ExpressionResult<Value> {
        Interpreter::new(&self.features, &self.config)
            .value_of(scope, node)
            .await
    }

    /// Validate `ast`, then evaluate it against `scope`.
    pub async fn evaluate(&self, scope: &Scope, ast: &Node) -> ExpressionResult<Value> {
        let node = self.validate(ast)?;
        let value = self.value_of(scope, &node).await?;
        debug!("Evaluated `{node}` to {value}");
        Ok(value)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("schema", self.schema())
            .field("features", &self.features)
            .field("config", &self.config)
            .finish()
    }
}
