//! SQL compilation.

use std::sync::Arc;

use common_config::OptimizerConfig;
use common_error::{ExpressionError, ExpressionResult};
use log::debug;
use rulekit_core::{Node, Schema};

use crate::domain::{Domain, SqlFragment};
use crate::feature::{ArgumentCompiler, StaticFeature};
use crate::reducer::SqlOptimizer;

/// Compiles rules into SQL fragments.
///
/// The SQL-domain optimizer is the whole compiler: a rule compiles when every
/// identifier resolves to a `field` or `placeholder` schema entry (or a
/// SQL-producing feature) so that the tree folds into a single verbatim
/// literal holding the SQL text.
pub struct SqlCompiler {
    optimizer: SqlOptimizer,
}

impl SqlCompiler {
    /// Create a compiler over a SQL schema.
    pub fn new(schema: Schema) -> Self {
        Self {
            optimizer: SqlOptimizer::new(schema),
        }
    }

    /// Replace the optimizer configuration.
    #[must_use]
    pub fn with_config(mut self, config: OptimizerConfig) -> Self {
        self.optimizer = self.optimizer.with_config(config);
        self
    }

    /// Register a SQL-producing feature.
    pub fn add_feature(
        &mut self,
        name: impl Into<String>,
        feature: Arc<dyn StaticFeature<SqlFragment>>,
    ) {
        self.optimizer.add_feature(name, feature);
    }

    /// The underlying SQL-domain optimizer.
    pub fn optimizer(&self) -> &SqlOptimizer {
        &self.optimizer
    }

    /// Validate and fold without requiring a complete compile.
    pub fn validate(&self, ast: &Node) -> ExpressionResult<Node> {
        self.optimizer.validate(ast)
    }

    /// Compile `ast` into SQL text. Fails with `NotConstant` when part of the
    /// rule cannot be expressed in SQL.
    pub fn compile_to_sql(&self, ast: &Node) -> ExpressionResult<String> {
        let node = self.optimizer.validate(ast)?;
        let Some((value, verbatim)) = node.as_literal() else {
            return Err(ExpressionError::not_constant(format!(
                "`{node}` does not compile to SQL"
            )));
        };

        let sql = self.optimizer.domain().render_literal(value, verbatim)?.to_sql();
        debug!("Compiled rule to SQL: {sql}");
        Ok(sql)
    }
}

impl ArgumentCompiler for SqlCompiler {
    fn compile_argument(&self, argument: &Node) -> ExpressionResult<String> {
        self.compile_to_sql(argument)
    }
}
