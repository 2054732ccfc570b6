use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use common_error::{ensure, ExpressionResult};
use log::debug;
use rulekit_core::{Scope, Shape, Value};
use rulekit_engine::{ArgumentCompiler, EvaluationResult, FeatureDescriptor, FeatureFunction};
use rulekit_optimizer::SqlCompiler;

/// Executes aggregate statements against the transaction store.
#[async_trait]
pub trait QueryRunner: Send + Sync {
    /// Run `statement`. Named parameters such as `:identityId` are bound from
    /// `scope` by the runner.
    async fn run(&self, scope: &Scope, statement: String) -> ExpressionResult<Value>;
}

/// Runner that returns the statement text instead of executing it.
#[derive(Debug, Default, Clone, Copy)]
pub struct StatementText;

#[async_trait]
impl QueryRunner for StatementText {
    async fn run(&self, _scope: &Scope, statement: String) -> ExpressionResult<Value> {
        Ok(Value::String(statement))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregate {
    /// `count(filter?, period?)`
    Count,
    /// `sum(expr, filter?, period?)`
    Sum,
}

impl Aggregate {
    fn name(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
        }
    }

    /// Arguments before the optional `filter` and `period`.
    fn leading(self) -> usize {
        match self {
            Self::Count => 0,
            Self::Sum => 1,
        }
    }
}

impl fmt::Display for Aggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Aggregate over the owner's past transactions.
///
/// Arguments are compiled to SQL during validation, so at runtime they arrive
/// as SQL text.
pub struct AggregateFeature {
    aggregate: Aggregate,
    compiler: Arc<SqlCompiler>,
    runner: Arc<dyn QueryRunner>,
}

impl AggregateFeature {
    const WEIGHT: u32 = 100;

    pub fn new(aggregate: Aggregate, compiler: Arc<SqlCompiler>) -> Self {
        Self {
            aggregate,
            compiler,
            runner: Arc::new(StatementText),
        }
    }

    pub fn count(compiler: Arc<SqlCompiler>) -> Self {
        Self::new(Aggregate::Count, compiler)
    }

    pub fn sum(compiler: Arc<SqlCompiler>) -> Self {
        Self::new(Aggregate::Sum, compiler)
    }

    #[must_use]
    pub fn with_runner(mut self, runner: Arc<dyn QueryRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Build the statement for compiled `arguments`.
    pub fn statement(&self, arguments: &[Value]) -> ExpressionResult<String> {
        self.check_arity(arguments.len())?;
        let (leading, optional) = arguments.split_at(self.aggregate.leading());

        let selected = match self.aggregate {
            Aggregate::Count => "COUNT(t.id)".to_string(),
            Aggregate::Sum => format!("SUM({})", leading[0]),
        };

        let mut conditions = vec!["t.identity_id=:identityId".to_string()];
        // Falsy arguments are treated as absent
        let filter = optional.first().filter(|filter| filter.is_truthy());
        let period = optional.get(1).filter(|period| period.is_truthy());
        if let Some(filter) = filter {
            conditions.push(filter.to_string());
        }
        match period {
            Some(period) => conditions.push(format!("t.created_at BETWEEN DATE_SUB(NOW(),{period}) AND NOW()")),
            None => conditions.push("t.created_at<=NOW()".to_string()),
        }

        Ok(format!(
            "SELECT {selected} FROM transactions AS t WHERE {}",
            conditions.join(" AND ")
        ))
    }

    fn check_arity(&self, arity: usize) -> ExpressionResult<()> {
        let leading = self.aggregate.leading();
        ensure!(
            (leading..=leading + 2).contains(&arity),
            TypeError: "{}() takes {} to {} arguments, got {}",
            self.aggregate,
            leading,
            leading + 2,
            arity
        );
        Ok(())
    }
}

impl fmt::Debug for AggregateFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregateFeature")
            .field("aggregate", &self.aggregate)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl FeatureFunction for AggregateFeature {
    fn describe(&self, arguments: &[EvaluationResult<Value>]) -> ExpressionResult<FeatureDescriptor<Value>> {
        self.check_arity(arguments.len())?;
        Ok(FeatureDescriptor::new(Self::WEIGHT, Shape::scalar("number")))
    }

    fn argument_compiler(&self) -> Option<Arc<dyn ArgumentCompiler>> {
        Some(self.compiler.clone())
    }

    async fn call(&self, scope: &Scope, arguments: Vec<Value>) -> ExpressionResult<Value> {
        let statement = self.statement(&arguments)?;
        debug!("Running {} query: {statement}", self.aggregate);
        self.runner.run(scope, statement).await
    }
}
