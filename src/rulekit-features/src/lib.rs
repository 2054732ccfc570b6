//! Concrete features for transaction rules.
//!
//! - [`TypeClassifier`]: `isCredit()` / `isDebit()`, usable by the engine and
//!   by the SQL compiler
//! - [`AggregateFeature`]: `count(filter?, period?)` and
//!   `sum(expr, filter?, period?)`, whose arguments are compiled to SQL and
//!   whose statements are run by a [`QueryRunner`]

mod aggregate;
mod classify;

use std::sync::Arc;

use rulekit_engine::Engine;
use rulekit_optimizer::SqlCompiler;

pub use aggregate::{Aggregate, AggregateFeature, QueryRunner, StatementText};
pub use classify::{TypeClassifier, CREDIT_TYPES, DEBIT_TYPES};

/// Register the SQL forms of the classifiers on `compiler`.
pub fn register_sql_features(compiler: &mut SqlCompiler) {
    compiler.add_feature("isCredit", Arc::new(TypeClassifier::credit()));
    compiler.add_feature("isDebit", Arc::new(TypeClassifier::debit()));
}

/// Register every feature on `engine`. Aggregate arguments are compiled by
/// `compiler` and their statements handed to `runner`.
pub fn register_features(engine: &mut Engine, compiler: Arc<SqlCompiler>, runner: Arc<dyn QueryRunner>) {
    engine.add_feature("isCredit", Arc::new(TypeClassifier::credit()));
    engine.add_feature("isDebit", Arc::new(TypeClassifier::debit()));
    engine.add_feature(
        "count",
        Arc::new(AggregateFeature::count(Arc::clone(&compiler)).with_runner(Arc::clone(&runner))),
    );
    engine.add_feature(
        "sum",
        Arc::new(AggregateFeature::sum(compiler).with_runner(runner)),
    );
}
